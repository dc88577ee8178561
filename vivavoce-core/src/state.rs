use serde::{Deserialize, Serialize};

/// The controller's current phase. Exactly one state is active at a time;
/// transitions happen only from completed operations or user actions.
///
/// `Asking` and `Evaluating` are reported by the service while it is
/// generating the next turn or scoring the interview; the client treats
/// them like `InProgress` for enablement purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Initializing,
    Ready,
    AwaitingResponse,
    Recording,
    InProgress,
    Asking,
    Evaluating,
    Finished,
    Error,
}

impl SessionState {
    /// Maps a status string from `/get-ai-message` onto a state. The
    /// service never reports `Idle` or `Recording`; those are client-side.
    pub fn from_server_status(status: &str) -> Option<Self> {
        match status {
            "INITIALIZING" => Some(Self::Initializing),
            "READY" => Some(Self::Ready),
            "AWAITING_RESPONSE" => Some(Self::AwaitingResponse),
            "IN_PROGRESS" => Some(Self::InProgress),
            "ASKING" => Some(Self::Asking),
            "EVALUATING" => Some(Self::Evaluating),
            "FINISHED" => Some(Self::Finished),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    // A stable string label for UI display.
    // This is intentionally not derived from `Debug`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::AwaitingResponse => "awaiting response",
            Self::Recording => "recording",
            Self::InProgress => "processing",
            Self::Asking => "asking",
            Self::Evaluating => "evaluating",
            Self::Finished => "finished",
            Self::Error => "error",
        }
    }
}

/// Which user actions are permitted right now. Derived purely from the
/// state so the table is testable without any rendering attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub record: bool,
    pub stop: bool,
    pub report: bool,
}

impl Controls {
    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::AwaitingResponse => Self {
                record: true,
                stop: false,
                report: false,
            },
            SessionState::Recording => Self {
                record: false,
                stop: true,
                report: false,
            },
            SessionState::Finished => Self {
                record: false,
                stop: false,
                report: true,
            },
            // Idle, Initializing, Ready, the processing states, and Error
            // all permit nothing.
            _ => Self {
                record: false,
                stop: false,
                report: false,
            },
        }
    }
}
