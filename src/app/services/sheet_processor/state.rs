//! Sheet processing states

use serde::Serialize;
use std::fmt;

/// Where a sheet is in its pipeline; any state may move to `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessingState {
    Detecting,
    HeaderLocating,
    Mapping,
    Transforming,
    Geocoding,
    Filtering,
    Done,
    Failed,
}

impl ProcessingState {
    /// The state that follows this one on success
    pub fn next(self) -> Option<ProcessingState> {
        use ProcessingState::*;
        match self {
            Detecting => Some(HeaderLocating),
            HeaderLocating => Some(Mapping),
            Mapping => Some(Transforming),
            Transforming => Some(Geocoding),
            Geocoding => Some(Filtering),
            Filtering => Some(Done),
            Done | Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingState::Done | ProcessingState::Failed)
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
