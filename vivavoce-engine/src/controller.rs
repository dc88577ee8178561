use std::sync::Arc;

use thiserror::Error;
use vivavoce_api::endpoints::{
    build_ai_message_request, build_report_request, build_start_interview_request,
    build_submit_response_request,
};
use vivavoce_api::parse::{
    filename_from_disposition, parse_ai_message, parse_error_body, parse_start_response,
    remote_error_message,
};
use vivavoce_api::runtime::{HttpResponse, Transport};
use vivavoce_core::{AudioClip, ClientConfig, InterviewSetup, SessionState};

use crate::session::{Session, SessionStatus};
use crate::traits::{ReportSink, ResponseRecorder, negotiate_encoding};

#[derive(Debug, Error)]
pub enum SessionError {
    /// Bad local input or unmet precondition; no network call was made.
    #[error("{0}")]
    Validation(String),

    #[error("capture device error: {0}")]
    Device(String),

    #[error("no audio recorded or recording is empty")]
    EmptyRecording,

    /// The service answered with a non-success status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// No response received at all.
    #[error("network error: {0}")]
    Transport(String),

    #[error("failed to save report: {0}")]
    ReportSave(String),
}

/// Drives one interview end to end: start, prompt fetching, recording,
/// submission, report download. Strictly serial: every operation is
/// awaited to completion before the next may begin, and the front-end
/// gates input on [`SessionStatus::controls`] in between.
pub struct SessionController {
    base_url: String,
    transport: Transport,
    recorder: Arc<dyn ResponseRecorder>,
    report_sink: Arc<dyn ReportSink>,
    session: Session,
}

impl SessionController {
    pub fn new(
        config: ClientConfig,
        recorder: Arc<dyn ResponseRecorder>,
        report_sink: Arc<dyn ReportSink>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: config.base_url,
            transport: Transport::new()?,
            recorder,
            report_sink,
            session: Session::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::of(&self.session)
    }

    /// Clears the persistent message area. The message survives state
    /// transitions until the user dismisses it or a new operation begins.
    pub fn clear_error(&mut self) {
        self.session.status_message = None;
    }

    /// Validates the setup locally, then creates the interview and fetches
    /// the opening prompt. Validation failure leaves the session untouched;
    /// a remote failure leaves no partial session behind, so calling start
    /// again is always safe.
    pub async fn start(&mut self, setup: InterviewSetup) -> Result<(), SessionError> {
        if let Err(e) = setup.validate() {
            return Err(self.surface(SessionError::Validation(e.to_string())));
        }

        self.session = Session::new();
        self.session.state = SessionState::Initializing;

        let req = build_start_interview_request(&self.base_url, &setup);
        let resp = match self.transport.execute(&req).await {
            Ok(r) => r,
            Err(e) => return Err(self.fail(SessionError::Transport(e.to_string()))),
        };

        if !resp.is_success() {
            return Err(self.fail(remote_error(&resp)));
        }

        let id = match parse_start_response(&resp.body) {
            Ok(id) => id,
            Err(e) => return Err(self.fail(malformed_response(&resp, e))),
        };

        log::info!("interview started: {id}");
        self.session.id = Some(id);
        self.session.state = SessionState::Ready;

        self.fetch_next_prompt().await
    }

    /// Fetches the next AI turn and moves to the state the service
    /// reports. The service drives the linear progression; the client only
    /// interleaves its own `Recording` phase.
    pub async fn fetch_next_prompt(&mut self) -> Result<(), SessionError> {
        if self.session.id.is_none() {
            return Err(self.surface(SessionError::Validation("no active interview".into())));
        }

        let req = build_ai_message_request(&self.base_url);
        let resp = match self.transport.execute(&req).await {
            Ok(r) => r,
            Err(e) => return Err(self.fail(SessionError::Transport(e.to_string()))),
        };

        if !resp.is_success() {
            return Err(self.fail(remote_error(&resp)));
        }

        // The service reports some failures inside a 2xx body.
        if let Some(message) = parse_error_body(&resp.body) {
            return Err(self.fail(SessionError::Remote {
                status: resp.status,
                message,
            }));
        }

        let msg = match parse_ai_message(&resp.body) {
            Ok(m) => m,
            Err(e) => return Err(self.fail(malformed_response(&resp, e))),
        };

        self.session.state = SessionState::from_server_status(&msg.status).unwrap_or_else(|| {
            log::warn!("unknown interview status from service: {}", msg.status);
            SessionState::Idle
        });
        log::info!("AI turn received, status {}", msg.status);
        self.session.prompt = Some(msg.ai_message);

        Ok(())
    }

    /// Negotiates the upload encoding and acquires the capture stream.
    /// Device failure surfaces but does not transition; the user stays
    /// free to fix the microphone and try again.
    pub async fn begin_recording(&mut self) -> Result<(), SessionError> {
        if self.session.state != SessionState::AwaitingResponse {
            return Err(self.surface(SessionError::Validation(
                "not awaiting a response; cannot record now".into(),
            )));
        }

        self.session.status_message = None;

        let encoding = negotiate_encoding(self.recorder.as_ref());
        if let Err(e) = self.recorder.begin(encoding).await {
            return Err(self.surface(SessionError::Device(e.to_string())));
        }

        log::info!("recording started ({})", encoding.mime_type());
        self.session.recording_encoding = Some(encoding);
        self.session.state = SessionState::Recording;
        Ok(())
    }

    /// Finalizes the capture, assembles the clip, and hands it straight to
    /// `submit_response`. Calling this while not recording is not an error
    /// condition; it is logged and ignored.
    pub async fn stop_recording(&mut self) -> Result<(), SessionError> {
        if self.session.state != SessionState::Recording {
            log::warn!("stop requested while not recording; ignoring");
            return Ok(());
        }

        let encoding = self
            .session
            .recording_encoding
            .take()
            .unwrap_or_else(|| self.recorder.default_encoding());

        match self.recorder.finish().await {
            Ok(bytes) => {
                log::info!("recording stopped: {} bytes ({})", bytes.len(), encoding.mime_type());
                self.session.pending_audio = Some(AudioClip { encoding, bytes });
                self.session.state = SessionState::InProgress;
                self.submit_response().await
            }
            Err(e) => {
                // The recorder releases the stream best-effort on its error
                // path; let the user record the answer again.
                self.session.state = SessionState::AwaitingResponse;
                Err(self.surface(SessionError::Device(e.to_string())))
            }
        }
    }

    /// Uploads the pending clip. An absent or empty clip never reaches the
    /// network. On upload failure the clip is abandoned and the state
    /// returns to `AwaitingResponse`: the client cannot know whether the
    /// service applied the submission, so it opts for allowing a re-record
    /// over wedging the session.
    pub async fn submit_response(&mut self) -> Result<(), SessionError> {
        let id = match &self.session.id {
            Some(id) => id.clone(),
            None => {
                return Err(self.surface(SessionError::Validation("no active interview".into())));
            }
        };

        let clip = match self.session.pending_audio.take() {
            Some(c) if !c.is_empty() => c,
            _ => {
                if self.session.state == SessionState::InProgress {
                    self.session.state = SessionState::AwaitingResponse;
                }
                return Err(self.surface(SessionError::EmptyRecording));
            }
        };

        let req = build_submit_response_request(&self.base_url, &id, &clip);
        match self.transport.execute(&req).await {
            Ok(resp) if resp.is_success() => {
                // The clip is already cleared; only now ask for the next turn.
                log::info!("response submitted ({} bytes)", clip.bytes.len());
                self.fetch_next_prompt().await
            }
            Ok(resp) => {
                self.session.state = SessionState::AwaitingResponse;
                Err(self.surface(remote_error(&resp)))
            }
            Err(e) => {
                self.session.state = SessionState::AwaitingResponse;
                Err(self.surface(SessionError::Transport(e.to_string())))
            }
        }
    }

    /// Downloads the report and saves it through the sink, deriving the
    /// filename from the disposition header when the service provides one.
    /// The session returns to `Finished` whatever happens, so the download
    /// can be retried and does not end the interview.
    pub async fn get_report(&mut self) -> Result<String, SessionError> {
        let id = match &self.session.id {
            Some(id) => id.clone(),
            None => {
                return Err(self.surface(SessionError::Validation("no active interview".into())));
            }
        };

        let req = build_report_request(&self.base_url);
        let outcome = match self.transport.execute(&req).await {
            Err(e) => Err(SessionError::Transport(e.to_string())),
            Ok(resp) if !resp.is_success() => Err(remote_error(&resp)),
            Ok(resp) => {
                let filename = resp
                    .header("content-disposition")
                    .and_then(filename_from_disposition)
                    .unwrap_or_else(|| format!("interview_report_{}.pdf", id.as_str()));

                match self.report_sink.save(&filename, &resp.body).await {
                    Ok(()) => Ok(filename),
                    Err(e) => Err(SessionError::ReportSave(e.to_string())),
                }
            }
        };

        self.session.state = SessionState::Finished;

        match outcome {
            Ok(filename) => {
                log::info!("report saved as {filename}");
                Ok(filename)
            }
            Err(e) => Err(self.surface(e)),
        }
    }

    /// Logs the error and parks it in the message area without touching
    /// the state.
    fn surface(&mut self, err: SessionError) -> SessionError {
        log::error!("session error: {err}");
        self.session.status_message = Some(err.to_string());
        err
    }

    /// `surface` plus the transition to the terminal `Error` state.
    fn fail(&mut self, err: SessionError) -> SessionError {
        self.session.state = SessionState::Error;
        self.surface(err)
    }
}

fn remote_error(resp: &HttpResponse) -> SessionError {
    SessionError::Remote {
        status: resp.status,
        message: remote_error_message(resp.status, &resp.body),
    }
}

fn malformed_response(resp: &HttpResponse, err: anyhow::Error) -> SessionError {
    SessionError::Remote {
        status: resp.status,
        message: format!("unexpected response from service: {err}"),
    }
}
