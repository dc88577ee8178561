use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;

use vivavoce_audio::AudioRecorder;
use vivavoce_core::{AudioEncoding, ClientConfig, DocumentAttachment, InterviewSetup, SessionState};
use vivavoce_engine::controller::SessionController;
use vivavoce_engine::session::SessionStatus;
use vivavoce_engine::traits::{ReportSink, ResponseRecorder};

/// Voice interview practice client: attach a resume and a job description,
/// answer the interviewer out loud, download the evaluation report.
#[derive(Debug, Parser)]
#[command(name = "vivavoce", version)]
struct Args {
    /// Resume PDF to attach.
    #[arg(long, required_unless_present = "list_devices")]
    resume: Option<PathBuf>,

    /// Job description text, inline.
    #[arg(long, conflicts_with = "job_description_file")]
    job_description: Option<String>,

    /// Read the job description from a text file.
    #[arg(long)]
    job_description_file: Option<PathBuf>,

    /// Base URL of the interview service.
    #[arg(long, default_value = "http://localhost:5000")]
    base_url: String,

    /// Capture device name; the system default when omitted.
    #[arg(long)]
    microphone: Option<String>,

    /// Directory the report is saved into.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// List capture device names and exit.
    #[arg(long)]
    list_devices: bool,
}

/// Bridges the cpal recorder into the engine's capture seam. The recorder
/// is opened lazily on the first recording and kept for the session.
struct MicrophoneRecorder {
    device_name: Option<String>,
    inner: tokio::sync::Mutex<Option<AudioRecorder>>,
}

impl MicrophoneRecorder {
    fn new(device_name: Option<String>) -> Self {
        Self {
            device_name,
            inner: tokio::sync::Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl ResponseRecorder for MicrophoneRecorder {
    fn supports_encoding(&self, encoding: AudioEncoding) -> bool {
        encoding == AudioRecorder::NATIVE_ENCODING
    }

    fn default_encoding(&self) -> AudioEncoding {
        AudioRecorder::NATIVE_ENCODING
    }

    async fn begin(&self, _encoding: AudioEncoding) -> anyhow::Result<()> {
        let mut guard = self.inner.lock().await;
        if guard.is_none() {
            *guard = Some(AudioRecorder::open_named(self.device_name.as_deref())?);
        }
        guard
            .as_ref()
            .context("capture device unavailable")?
            .start()?;
        Ok(())
    }

    async fn finish(&self) -> anyhow::Result<Vec<u8>> {
        let guard = self.inner.lock().await;
        let recorder = guard.as_ref().context("recording was never started")?;
        let captured = recorder.stop_captured()?;
        log::info!(
            "captured {} samples at {} Hz",
            captured.samples.len(),
            captured.sample_rate_hz
        );
        Ok(captured.into_wav_clip()?.bytes)
    }
}

/// Save-as-download onto the local filesystem.
struct DownloadDir {
    dir: PathBuf,
}

#[async_trait::async_trait]
impl ReportSink for DownloadDir {
    async fn save(&self, filename: &str, content: &[u8]) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if args.list_devices {
        for name in AudioRecorder::list_input_device_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(resume_path) = args.resume else {
        bail!("--resume is required");
    };
    let job_description = match (args.job_description, args.job_description_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?,
        (None, None) => bail!("provide --job-description or --job-description-file"),
    };

    let resume_bytes =
        std::fs::read(&resume_path).with_context(|| format!("read {}", resume_path.display()))?;
    let resume_filename = resume_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume.pdf".into());

    let setup = InterviewSetup {
        resume: DocumentAttachment {
            filename: resume_filename,
            mime_type: "application/pdf".into(),
            bytes: resume_bytes,
        },
        job_description,
    };

    let config = ClientConfig {
        base_url: args.base_url,
        microphone_device: args.microphone,
    };
    let recorder = Arc::new(MicrophoneRecorder::new(config.microphone_device.clone()));
    let sink = Arc::new(DownloadDir {
        dir: args.output_dir,
    });
    let mut controller = SessionController::new(config, recorder, sink)?;

    println!("Starting interview...");
    if let Err(e) = controller.start(setup).await {
        bail!("could not start the interview: {e}");
    }

    run_interview(&mut controller).await
}

async fn run_interview(controller: &mut SessionController) -> anyhow::Result<()> {
    loop {
        let status = controller.status();
        render(&status);
        controller.clear_error();

        match status.state {
            SessionState::AwaitingResponse => {
                wait_for_enter("Press Enter to start recording your answer...")?;
                if controller.begin_recording().await.is_err() {
                    // The message area carries the details; offer another go.
                    continue;
                }
                wait_for_enter("Recording. Press Enter to stop...")?;
                // A failed submit resets to AwaitingResponse and the loop
                // offers to record again.
                let _ = controller.stop_recording().await;
            }
            SessionState::Ready
            | SessionState::InProgress
            | SessionState::Asking
            | SessionState::Evaluating => {
                // The service is still working on its next turn.
                tokio::time::sleep(Duration::from_secs(1)).await;
                if controller.fetch_next_prompt().await.is_err() {
                    continue;
                }
            }
            SessionState::Finished => {
                match controller.get_report().await {
                    Ok(filename) => println!("Report saved as {filename}"),
                    Err(e) => eprintln!("Report download failed: {e}"),
                }
                return Ok(());
            }
            SessionState::Error => {
                bail!(
                    "interview ended with an error: {}",
                    status.message.as_deref().unwrap_or("unknown")
                );
            }
            SessionState::Idle | SessionState::Initializing | SessionState::Recording => {
                bail!("session is in an unexpected state: {}", status.state_label);
            }
        }
    }
}

fn render(status: &SessionStatus) {
    println!();
    println!("[{}]", status.state_label);
    if let Some(prompt) = &status.prompt {
        println!("AI: {prompt}");
    }
    if let Some(message) = &status.message {
        println!("(!) {message}");
    }
}

fn wait_for_enter(message: &str) -> anyhow::Result<()> {
    use std::io::Write;

    print!("{message} ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(())
}
