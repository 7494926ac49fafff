//! HTTP client for the remote note service
//!
//! All JSON calls are `POST` with a bearer token. Asset delivery goes to the
//! endpoint handed out by `/upload/prepare` and authenticates with the form
//! fields of that authorization instead of the bearer token.

use crate::error::{PublishError, PublishResult};
use crate::media::MediaType;
use quill_core::{Document, Privacy, VisibilitySettings};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Settings sent with a create/edit call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSettings {
    /// Publish immediately instead of saving a draft
    pub auto_publish: bool,
    /// Tags attached to the note
    pub tags: Vec<String>,
    /// Privacy, only when the restricted section was chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveNoteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    note_id: Option<&'a str>,
    body: &'a Document,
    settings: &'a NoteSettings,
}

/// Single-use upload credentials for one asset.
///
/// Consumed by [`NoteClient::deliver`]; a fresh one is requested per asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAuthorization {
    /// Where to post the multipart form
    pub endpoint: String,
    /// Form fields to send alongside the file
    pub fields: Vec<(String, String)>,
}

/// Client for the note service
pub struct NoteClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl NoteClient {
    /// Create a client for `base_url` (e.g. `https://open.mowen.cn/api/open/api/v1`)
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Create or update a note. Updates when `note_id` is given.
    ///
    /// Returns the identifier the service assigned (or kept).
    pub async fn save_note(
        &self,
        note_id: Option<&str>,
        document: &Document,
        settings: &NoteSettings,
    ) -> PublishResult<String> {
        let endpoint = if note_id.is_some() {
            "/note/edit"
        } else {
            "/note/create"
        };
        let request = SaveNoteRequest {
            note_id,
            body: document,
            settings,
        };

        let (status, payload) = self.post_json(endpoint, &request).await?;
        let returned = payload
            .get("noteId")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        match returned {
            Some(id) if status == StatusCode::OK => {
                debug!("{} succeeded for note {}", endpoint, id);
                Ok(id)
            }
            _ => Err(PublishError::remote(
                server_message(&payload).unwrap_or_else(|| format!("Publish failed ({status})")),
                Some(payload),
            )),
        }
    }

    /// Apply section and privacy to a saved note
    pub async fn set_visibility(
        &self,
        note_id: &str,
        visibility: &VisibilitySettings,
    ) -> PublishResult<()> {
        let request = json!({
            "noteId": note_id,
            "section": visibility.section.code(),
            "settings": { "privacy": visibility.privacy },
        });

        let (status, payload) = self.post_json("/note/set", &request).await?;
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(PublishError::remote(
                server_message(&payload)
                    .unwrap_or_else(|| format!("Visibility update failed ({status})")),
                Some(payload),
            ))
        }
    }

    /// Phase one of an upload: request credentials for one asset
    pub async fn prepare_upload(&self, media: MediaType) -> PublishResult<UploadAuthorization> {
        let request = json!({ "fileType": media.code() });
        let (status, payload) = self
            .post_json("/upload/prepare", &request)
            .await
            .map_err(|e| PublishError::UploadAuthorization(e.to_string()))?;

        let form = match payload.get("form").and_then(Value::as_object) {
            Some(form) if status == StatusCode::OK => form,
            _ => {
                return Err(PublishError::UploadAuthorization(
                    server_message(&payload).unwrap_or_else(|| format!("no upload form ({status})")),
                ))
            }
        };

        let endpoint = form
            .get("endpoint")
            .and_then(Value::as_str)
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| PublishError::UploadAuthorization("upload form has no endpoint".into()))?
            .to_string();

        let fields = form
            .iter()
            .filter(|(key, _)| key.as_str() != "endpoint")
            .map(|(key, value)| (key.clone(), field_value(value)))
            .collect();

        Ok(UploadAuthorization { endpoint, fields })
    }

    /// Phase two of an upload: post the file with the authorization's fields.
    ///
    /// Returns the asset identifier.
    pub async fn deliver(
        &self,
        authorization: UploadAuthorization,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> PublishResult<String> {
        let UploadAuthorization { endpoint, fields } = authorization;

        let mut form = Form::new();
        for (key, value) in fields {
            form = form.text(key, value);
        }
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| PublishError::UploadDelivery(e.to_string()))?;
        form = form.part("file", part);

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PublishError::UploadDelivery(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PublishError::UploadDelivery(e.to_string()))?;
        let payload: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));

        match asset_id(&payload) {
            Some(id) if status.is_success() => {
                debug!("Delivered {} as asset {}", file_name, id);
                Ok(id)
            }
            _ => Err(PublishError::UploadDelivery(
                server_message(&payload).unwrap_or_else(|| format!("no asset id ({status})")),
            )),
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> PublishResult<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<Value>(&text) {
            Ok(payload) => Ok((status, payload)),
            Err(_) if text.trim().is_empty() => Ok((status, Value::Null)),
            Err(e) => Err(PublishError::remote(
                format!("Invalid response from {endpoint} ({status}): {e}"),
                Some(Value::String(text)),
            )),
        }
    }
}

fn server_message(payload: &Value) -> Option<String> {
    ["msg", "message"]
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `{"file": "id"}` or `{"file": {"fileId": "id", ...}}`
fn asset_id(payload: &Value) -> Option<String> {
    let file = payload.get("file")?;
    let id = match file {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => ["fileId", "uuid", "id"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str)),
        _ => None,
    }?;
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_string())
}
