use async_trait::async_trait;
use vivavoce_core::{AudioEncoding, ENCODING_PREFERENCES};

/// The capture seam. One recording cycle is `begin` followed by `finish`;
/// implementations accumulate data chunks in arrival order in between and
/// release the underlying stream when `finish` returns, best-effort on the
/// error path too.
#[async_trait]
pub trait ResponseRecorder: Send + Sync {
    /// Whether this recorder can produce the given encoding.
    fn supports_encoding(&self, encoding: AudioEncoding) -> bool;

    /// The encoding used when nothing on the preference list is supported.
    fn default_encoding(&self) -> AudioEncoding;

    /// Acquires the capture stream and starts accumulating chunks.
    async fn begin(&self, encoding: AudioEncoding) -> anyhow::Result<()>;

    /// Stops the stream and returns the accumulated chunks assembled into
    /// one buffer.
    async fn finish(&self) -> anyhow::Result<Vec<u8>>;
}

/// The save-as-download seam for report content.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn save(&self, filename: &str, content: &[u8]) -> anyhow::Result<()>;
}

/// First supported entry of the preference list wins; a recorder that
/// supports none of them records with its own default. Never fails.
pub fn negotiate_encoding(recorder: &dyn ResponseRecorder) -> AudioEncoding {
    ENCODING_PREFERENCES
        .into_iter()
        .find(|e| recorder.supports_encoding(*e))
        .unwrap_or_else(|| recorder.default_encoding())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRecorder {
        supported: Vec<AudioEncoding>,
    }

    #[async_trait]
    impl ResponseRecorder for FixedRecorder {
        fn supports_encoding(&self, encoding: AudioEncoding) -> bool {
            self.supported.contains(&encoding)
        }

        fn default_encoding(&self) -> AudioEncoding {
            AudioEncoding::WavPcm
        }

        async fn begin(&self, _encoding: AudioEncoding) -> anyhow::Result<()> {
            Ok(())
        }

        async fn finish(&self) -> anyhow::Result<Vec<u8>> {
            Ok(vec![])
        }
    }

    #[test]
    fn first_supported_preference_wins() {
        let rec = FixedRecorder {
            supported: vec![AudioEncoding::OggOpus, AudioEncoding::WebmOpus],
        };
        assert_eq!(negotiate_encoding(&rec), AudioEncoding::WebmOpus);

        let rec = FixedRecorder {
            supported: vec![AudioEncoding::OggOpus],
        };
        assert_eq!(negotiate_encoding(&rec), AudioEncoding::OggOpus);
    }

    #[test]
    fn falls_back_to_recorder_default() {
        let rec = FixedRecorder { supported: vec![] };
        assert_eq!(negotiate_encoding(&rec), AudioEncoding::WavPcm);
    }
}
