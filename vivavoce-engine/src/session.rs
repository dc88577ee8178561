use serde::Serialize;
use vivavoce_core::{AudioClip, AudioEncoding, Controls, InterviewId, SessionState};

/// The one mutable record of the client. All mutation happens from the
/// controller's single control flow; there is no interior mutability.
///
/// Invariants:
/// - `id` is set before any state beyond `Initializing` is reachable and
///   never changes afterwards.
/// - `pending_audio` is non-empty only while the state is `Recording` or
///   `InProgress`.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) id: Option<InterviewId>,
    pub(crate) state: SessionState,
    pub(crate) pending_audio: Option<AudioClip>,
    pub(crate) prompt: Option<String>,
    pub(crate) status_message: Option<String>,

    // The encoding negotiated for the current recording cycle; cleared
    // when the clip is assembled.
    pub(crate) recording_encoding: Option<AudioEncoding>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&InterviewId> {
        self.id.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn has_pending_audio(&self) -> bool {
        self.pending_audio.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Snapshot handed to the front-end after every operation; rendering is
/// entirely derived from this, never from controller internals.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub state_label: String,
    pub prompt: Option<String>,
    pub message: Option<String>,
    pub controls: Controls,
}

impl SessionStatus {
    pub fn of(session: &Session) -> Self {
        Self {
            state: session.state,
            state_label: session.state.label().into(),
            prompt: session.prompt.clone(),
            message: session.status_message.clone(),
            controls: Controls::for_state(session.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_idle_and_empty() {
        let s = Session::new();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.id().is_none());
        assert!(!s.has_pending_audio());
    }

    #[test]
    fn status_derives_controls_from_state() {
        let mut s = Session::new();
        s.state = SessionState::AwaitingResponse;
        s.prompt = Some("Tell me about a project.".into());

        let status = SessionStatus::of(&s);
        assert!(status.controls.record);
        assert!(!status.controls.stop);
        assert!(!status.controls.report);
        assert_eq!(status.state_label, "awaiting response");
        assert_eq!(status.prompt.as_deref(), Some("Tell me about a project."));
    }

    #[test]
    fn empty_clip_does_not_count_as_pending() {
        let mut s = Session::new();
        s.pending_audio = Some(AudioClip {
            encoding: AudioEncoding::WavPcm,
            bytes: vec![],
        });
        assert!(!s.has_pending_audio());
    }
}
