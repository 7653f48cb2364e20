//! Wire types for the Gemini v1beta REST API.
//!
//! Covers the three surfaces the application consumes:
//! * `models/{model}:generateContent` — text and multimodal inference.
//! * `upload/v1beta/files` — raw-protocol media upload.
//! * `v1beta/files/{id}` — processing-state refresh.
//!
//! Field names follow the API's camelCase JSON convention via serde renames.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request parts
// ---------------------------------------------------------------------------

/// One part of a content block — either inline text or a reference to an
/// uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

impl Part {
    /// Build a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Build a file-reference part from an uploaded file's URI and MIME type.
    pub fn file_data(file_uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Part::FileData {
            file_data: FileData {
                file_uri: file_uri.into(),
                mime_type: mime_type.into(),
            },
        }
    }
}

/// Reference to media previously uploaded through the Files API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}

/// An ordered list of parts attributed to a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

// ---------------------------------------------------------------------------
// GenerateRequest  (client-facing request description)
// ---------------------------------------------------------------------------

/// A generation request as the rest of the application describes it: an
/// optional system instruction plus the user-turn parts.  Converted to the
/// wire body by [`GenerateRequest::into_body`].
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    pub parts: Vec<Part>,
}

impl GenerateRequest {
    /// A plain text-only request.
    pub fn from_text(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            parts: vec![Part::text(prompt)],
        }
    }

    /// A multimodal request: an uploaded file followed by a text prompt.
    pub fn multimodal(file: &RemoteFile, prompt: impl Into<String>) -> Self {
        let mime = file
            .mime_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".into());
        Self {
            system_instruction: None,
            parts: vec![Part::file_data(file.uri.clone(), mime), Part::text(prompt)],
        }
    }

    /// Attach a system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Convert to the wire-format request body.
    pub fn into_body(self) -> GenerateContentBody {
        GenerateContentBody {
            system_instruction: self.system_instruction.map(|text| InstructionContent {
                parts: vec![Part::text(text)],
            }),
            contents: vec![Content {
                role: Some("user".into()),
                parts: self.parts,
            }],
        }
    }
}

/// `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<InstructionContent>,
    pub contents: Vec<Content>,
}

/// System instruction block — parts only, no role.
#[derive(Debug, Clone, Serialize)]
pub struct InstructionContent {
    pub parts: Vec<Part>,
}

// ---------------------------------------------------------------------------
// GenerateContentResponse
// ---------------------------------------------------------------------------

/// `generateContent` response body (only the fields the application reads).
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, or `None` when the
    /// response carries no usable text.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut out = String::new();
        for part in &content.parts {
            if let Part::Text { text } = part {
                out.push_str(text);
            }
        }
        if out.trim().is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteFile / FileState
// ---------------------------------------------------------------------------

/// Processing state of an uploaded file, owned and mutated by the API side.
/// The pipeline only ever observes it via polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    Processing,
    Active,
    Failed,
    #[default]
    #[serde(other)]
    StateUnspecified,
}

/// A file resource as returned by the Files API — an opaque handle plus its
/// asynchronous processing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Resource name, e.g. `"files/abc-123"`.
    pub name: String,
    /// Download/reference URI used in multimodal requests.
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub state: FileState,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Raw-protocol upload response wraps the file resource in a `file` field.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadFileResponse {
    pub file: RemoteFile,
}

// ---------------------------------------------------------------------------
// API error body
// ---------------------------------------------------------------------------

/// Standard Google API error envelope on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn active_file() -> RemoteFile {
        RemoteFile {
            name: "files/abc-123".into(),
            uri: "https://generativelanguage.googleapis.com/v1beta/files/abc-123".into(),
            state: FileState::Active,
            mime_type: Some("video/mp4".into()),
        }
    }

    // -----------------------------------------------------------------------
    // Request serialisation
    // -----------------------------------------------------------------------

    #[test]
    fn text_request_serialises_to_camel_case() {
        let body = GenerateRequest::from_text("hello")
            .with_system_instruction("be brief")
            .into_body();

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "be brief"
        );
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn text_request_without_system_instruction_omits_the_field() {
        let body = GenerateRequest::from_text("hello").into_body();
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn multimodal_request_puts_file_part_before_text() {
        let body = GenerateRequest::multimodal(&active_file(), "analyse this").into_body();
        let json = serde_json::to_value(&body).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(
            parts[0]["fileData"]["fileUri"],
            "https://generativelanguage.googleapis.com/v1beta/files/abc-123"
        );
        assert_eq!(parts[0]["fileData"]["mimeType"], "video/mp4");
        assert_eq!(parts[1]["text"], "analyse this");
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    #[test]
    fn response_text_joins_text_parts_of_first_candidate() {
        let raw = r#"{
            "candidates": [
                { "content": { "role": "model", "parts": [
                    { "text": "Strong opening. " },
                    { "text": "Weak close." }
                ] } }
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Strong opening. Weak close."));
    }

    #[test]
    fn response_without_candidates_yields_no_text() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text().is_none());
    }

    #[test]
    fn response_with_blank_text_yields_no_text() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"  "}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.text().is_none());
    }

    // -----------------------------------------------------------------------
    // File resources
    // -----------------------------------------------------------------------

    #[test]
    fn file_states_parse_from_screaming_snake_case() {
        let parse = |s: &str| serde_json::from_value::<FileState>(serde_json::json!(s)).unwrap();
        assert_eq!(parse("PROCESSING"), FileState::Processing);
        assert_eq!(parse("ACTIVE"), FileState::Active);
        assert_eq!(parse("FAILED"), FileState::Failed);
    }

    #[test]
    fn unknown_file_state_parses_as_unspecified() {
        let state: FileState =
            serde_json::from_value(serde_json::json!("SOMETHING_NEW")).unwrap();
        assert_eq!(state, FileState::StateUnspecified);
    }

    #[test]
    fn upload_response_unwraps_the_file_field() {
        let raw = r#"{
            "file": {
                "name": "files/abc-123",
                "uri": "https://example.invalid/files/abc-123",
                "state": "PROCESSING",
                "mimeType": "video/mp4"
            }
        }"#;
        let resp: UploadFileResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.file.name, "files/abc-123");
        assert_eq!(resp.file.state, FileState::Processing);
        assert_eq!(resp.file.mime_type.as_deref(), Some("video/mp4"));
    }

    #[test]
    fn get_file_response_parses_without_wrapper() {
        let raw = r#"{ "name": "files/abc-123", "state": "ACTIVE" }"#;
        let file: RemoteFile = serde_json::from_str(raw).unwrap();
        assert_eq!(file.state, FileState::Active);
        assert!(file.uri.is_empty());
        assert!(file.mime_type.is_none());
    }

    #[test]
    fn api_error_body_parses_message() {
        let raw = r#"{ "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" } }"#;
        let body: ApiErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.error.code, 400);
        assert_eq!(body.error.message, "API key not valid");
    }
}
