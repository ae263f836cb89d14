use std::fmt;

use serde::{Deserialize, Serialize};

/// Local view of an application's lifecycle, derived from the remote status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationState {
    None,
    Running,
    Starting,
    Stopping,
    Error,
    Stopped,
}

impl ApplicationState {
    /// Map a remote status string. Matching is exact and case-sensitive;
    /// anything unrecognized is [`ApplicationState::None`].
    pub fn from_status(status: &str) -> Self {
        match status {
            "RUNNING" => Self::Running,
            "STARTING" => Self::Starting,
            "STOPPING" => Self::Stopping,
            "ERROR" => Self::Error,
            "STOPPED" => Self::Stopped,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Running => "running",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
            Self::Error => "error",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
