use crate::request::{Body, HttpRequest};
use vivavoce_core::{AudioClip, InterviewId, InterviewSetup};

/// Builds `POST /start-interview`: the resume as a file part plus the job
/// description as a text part.
pub fn build_start_interview_request(base_url: &str, setup: &InterviewSetup) -> HttpRequest {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let mut body: Vec<u8> = Vec::new();
    append_file(
        &mut body,
        &boundary,
        "resume",
        &setup.resume.filename,
        &setup.resume.mime_type,
        &setup.resume.bytes,
    );
    append_field(&mut body, &boundary, "job_description", &setup.job_description);
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    HttpRequest {
        method: "POST".into(),
        url: join_url(base_url, "/start-interview"),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "application/json".into()),
        ],
        body: Body::MultipartFormData { boundary, bytes: body },
    }
}

pub fn build_ai_message_request(base_url: &str) -> HttpRequest {
    HttpRequest {
        method: "GET".into(),
        url: join_url(base_url, "/get-ai-message"),
        headers: vec![("Accept".into(), "application/json".into())],
        body: Body::Empty,
    }
}

/// Deterministic upload filename derived from the interview id and the
/// negotiated encoding.
pub fn response_filename(id: &InterviewId, clip: &AudioClip) -> String {
    format!(
        "interview_{}_response.{}",
        id.as_str(),
        clip.encoding.file_extension()
    )
}

/// Builds `POST /submit-response`: one binary `audio_data` part.
pub fn build_submit_response_request(
    base_url: &str,
    id: &InterviewId,
    clip: &AudioClip,
) -> HttpRequest {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let mut body: Vec<u8> = Vec::new();
    append_file(
        &mut body,
        &boundary,
        "audio_data",
        &response_filename(id, clip),
        clip.encoding.mime_type(),
        &clip.bytes,
    );
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    HttpRequest {
        method: "POST".into(),
        url: join_url(base_url, "/submit-response"),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "application/json".into()),
        ],
        body: Body::MultipartFormData { boundary, bytes: body },
    }
}

/// Builds `GET /get-report`. The success body is binary, so no Accept
/// header is sent; error bodies are still JSON.
pub fn build_report_request(base_url: &str) -> HttpRequest {
    HttpRequest {
        method: "GET".into(),
        url: join_url(base_url, "/get-report"),
        headers: vec![],
        body: Body::Empty,
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivavoce_core::{AudioEncoding, DocumentAttachment};

    fn setup() -> InterviewSetup {
        InterviewSetup {
            resume: DocumentAttachment {
                filename: "resume.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: vec![0x25, 0x50, 0x44, 0x46],
            },
            job_description: "Backend engineer, Rust".into(),
        }
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:5000/", "/get-ai-message"),
            "http://localhost:5000/get-ai-message"
        );
        assert_eq!(
            join_url("http://localhost:5000", "get-ai-message"),
            "http://localhost:5000/get-ai-message"
        );
    }

    #[test]
    fn start_request_carries_resume_and_job_description() {
        let req = build_start_interview_request("http://localhost:5000", &setup());
        assert_eq!(req.method, "POST");
        assert!(req.url.ends_with("/start-interview"));
        assert!(
            req.header("content-type")
                .is_some_and(|v| v.starts_with("multipart/form-data; boundary="))
        );

        match req.body {
            Body::MultipartFormData { bytes, .. } => {
                let s = String::from_utf8_lossy(&bytes);
                assert!(s.contains("name=\"resume\""));
                assert!(s.contains("filename=\"resume.pdf\""));
                assert!(s.contains("Content-Type: application/pdf"));
                assert!(s.contains("name=\"job_description\""));
                assert!(s.contains("Backend engineer, Rust"));
            }
            _ => panic!("expected multipart"),
        }
    }

    #[test]
    fn submit_request_names_file_after_interview_id() {
        let id = InterviewId::new("abc-123");
        let clip = AudioClip {
            encoding: AudioEncoding::WavPcm,
            bytes: vec![1, 2, 3],
        };
        let req = build_submit_response_request("http://localhost:5000", &id, &clip);
        assert!(req.url.ends_with("/submit-response"));

        match req.body {
            Body::MultipartFormData { bytes, .. } => {
                let s = String::from_utf8_lossy(&bytes);
                assert!(s.contains("name=\"audio_data\""));
                assert!(s.contains("filename=\"interview_abc-123_response.wav\""));
                assert!(s.contains("Content-Type: audio/wav"));
            }
            _ => panic!("expected multipart"),
        }
    }

    #[test]
    fn response_filename_tracks_encoding() {
        let id = InterviewId::new("x");
        let webm = AudioClip {
            encoding: AudioEncoding::WebmOpus,
            bytes: vec![0],
        };
        assert_eq!(response_filename(&id, &webm), "interview_x_response.webm");
    }

    #[test]
    fn get_requests_have_empty_bodies() {
        assert_eq!(build_ai_message_request("http://h").body, Body::Empty);
        assert_eq!(build_report_request("http://h").body, Body::Empty);
    }
}
