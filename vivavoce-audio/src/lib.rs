pub mod recorder;
pub mod wav;

pub use recorder::{AudioRecorder, CaptureError, CapturedAudio};
pub use wav::encode_wav_pcm16;
