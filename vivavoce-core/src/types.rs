use serde::{Deserialize, Serialize};

/// Opaque interview identifier issued by the service on start.
/// Never minted client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterviewId(pub String);

impl InterviewId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InterviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEncoding {
    WebmOpus,
    OggOpus,
    WavPcm,
}

impl AudioEncoding {
    pub fn mime_type(self) -> &'static str {
        match self {
            AudioEncoding::WebmOpus => "audio/webm;codecs=opus",
            AudioEncoding::OggOpus => "audio/ogg;codecs=opus",
            AudioEncoding::WavPcm => "audio/wav",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            AudioEncoding::WebmOpus => "webm",
            AudioEncoding::OggOpus => "ogg",
            AudioEncoding::WavPcm => "wav",
        }
    }
}

/// Upload encodings in preference order. A recorder that supports none of
/// these still records with its own default encoding.
pub const ENCODING_PREFERENCES: [AudioEncoding; 2] =
    [AudioEncoding::WebmOpus, AudioEncoding::OggOpus];

/// One assembled recording, tagged with the encoding it was captured in.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub encoding: AudioEncoding,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("encoding", &self.encoding)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DocumentAttachment {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for DocumentAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentAttachment")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// The local input required to start an interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewSetup {
    pub resume: DocumentAttachment,
    pub job_description: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("no resume file attached")]
    MissingResume,

    #[error("resume must be a PDF file")]
    ResumeNotPdf,

    #[error("job description is empty")]
    EmptyJobDescription,
}

impl InterviewSetup {
    /// Local validation only; the service re-validates on its side.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.resume.bytes.is_empty() {
            return Err(SetupError::MissingResume);
        }

        let is_pdf = self
            .resume
            .filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(SetupError::ResumeNotPdf);
        }

        if self.job_description.trim().is_empty() {
            return Err(SetupError::EmptyJobDescription);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> InterviewSetup {
        InterviewSetup {
            resume: DocumentAttachment {
                filename: "resume.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: vec![1, 2, 3],
            },
            job_description: "Senior plumber".into(),
        }
    }

    #[test]
    fn valid_setup_passes() {
        assert_eq!(setup().validate(), Ok(()));
    }

    #[test]
    fn empty_resume_is_rejected() {
        let mut s = setup();
        s.resume.bytes.clear();
        assert_eq!(s.validate(), Err(SetupError::MissingResume));
    }

    #[test]
    fn non_pdf_resume_is_rejected() {
        let mut s = setup();
        s.resume.filename = "resume.docx".into();
        assert_eq!(s.validate(), Err(SetupError::ResumeNotPdf));
    }

    #[test]
    fn pdf_extension_check_is_case_insensitive() {
        let mut s = setup();
        s.resume.filename = "RESUME.PDF".into();
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn blank_job_description_is_rejected() {
        let mut s = setup();
        s.job_description = "   \n".into();
        assert_eq!(s.validate(), Err(SetupError::EmptyJobDescription));
    }

    #[test]
    fn encoding_metadata_is_consistent() {
        for enc in ENCODING_PREFERENCES {
            assert!(enc.mime_type().contains("opus"));
        }
        assert_eq!(AudioEncoding::WavPcm.file_extension(), "wav");
    }
}
