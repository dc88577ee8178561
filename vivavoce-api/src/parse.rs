use anyhow::Context;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use vivavoce_core::InterviewId;

#[derive(Debug, Deserialize)]
struct StartInterviewResponse {
    interview_id: String,
}

pub fn parse_start_response(body: &[u8]) -> anyhow::Result<InterviewId> {
    let resp: StartInterviewResponse =
        serde_json::from_slice(body).context("decode start-interview JSON")?;
    Ok(InterviewId::new(resp.interview_id))
}

/// One AI turn: the message to show and the status string that drives the
/// state machine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AiMessage {
    pub ai_message: String,
    pub status: String,
}

pub fn parse_ai_message(body: &[u8]) -> anyhow::Result<AiMessage> {
    serde_json::from_slice(body).context("decode ai-message JSON")
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// The `{error}` message from a non-success body, or `None` when the body
/// is not that shape (e.g. HTML from a proxy).
pub fn parse_error_body(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|e| e.error)
        .filter(|m| !m.trim().is_empty())
}

/// The message to surface for a non-success response: the server-provided
/// error when parseable, else a generic status-derived one.
pub fn remote_error_message(status: u16, body: &[u8]) -> String {
    parse_error_body(body).unwrap_or_else(|| format!("request failed with status {status}"))
}

fn disposition_filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Quoted token first, then an unquoted run up to the next parameter.
        Regex::new(r#"(?i)filename[^;=\n]*=\s*(?:"([^"]*)"|'([^']*)'|([^;\r\n]*))"#)
            .expect("valid disposition filename regex")
    })
}

/// Extracts the filename parameter from a `Content-Disposition` attachment
/// header. `None` when the header is not an attachment or carries no
/// usable filename.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    if !header.contains("attachment") {
        return None;
    }

    let caps = disposition_filename_re().captures(header)?;
    let raw = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())?;

    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_interview_id() {
        let body = br#"{"interview_id":"abc-123","message":"Interview initialized successfully."}"#;
        assert_eq!(
            parse_start_response(body).unwrap(),
            InterviewId::new("abc-123")
        );
    }

    #[test]
    fn missing_interview_id_errors() {
        assert!(parse_start_response(br#"{"message":"ok"}"#).is_err());
    }

    #[test]
    fn parses_ai_message_and_status() {
        let body = br#"{"ai_message":"Tell me about yourself.","status":"AWAITING_RESPONSE"}"#;
        let msg = parse_ai_message(body).unwrap();
        assert_eq!(msg.ai_message, "Tell me about yourself.");
        assert_eq!(msg.status, "AWAITING_RESPONSE");
    }

    #[test]
    fn error_body_is_extracted() {
        assert_eq!(
            parse_error_body(br#"{"error":"No resume file selected."}"#),
            Some("No resume file selected.".into())
        );
        assert_eq!(parse_error_body(b"<html>502</html>"), None);
        assert_eq!(parse_error_body(br#"{"error":""}"#), None);
    }

    #[test]
    fn remote_message_falls_back_to_status() {
        assert_eq!(
            remote_error_message(500, br#"{"error":"LLM unavailable"}"#),
            "LLM unavailable"
        );
        assert_eq!(
            remote_error_message(502, b"bad gateway"),
            "request failed with status 502"
        );
    }

    #[test]
    fn quoted_disposition_filename() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="report_9.pdf""#),
            Some("report_9.pdf".into())
        );
    }

    #[test]
    fn unquoted_disposition_filename() {
        assert_eq!(
            filename_from_disposition("attachment; filename=report.pdf"),
            Some("report.pdf".into())
        );
    }

    #[test]
    fn filename_star_variant_is_tolerated() {
        // RFC 5987 `filename*=` also matches the token pattern.
        assert_eq!(
            filename_from_disposition("attachment; filename*=utf-8''report.pdf"),
            Some("utf-8''report.pdf".into())
        );
    }

    #[test]
    fn inline_disposition_yields_none() {
        assert_eq!(filename_from_disposition("inline"), None);
        assert_eq!(
            filename_from_disposition(r#"inline; filename="preview.pdf""#),
            None
        );
    }

    #[test]
    fn empty_or_missing_filename_yields_none() {
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }
}
