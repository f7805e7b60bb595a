//! Recognising JSON error bodies returned in place of an archive.

use crate::error::LoadError;

/// Extract the error message from a JSON error body.
///
/// Returns `None` unless `body` is a JSON object. The message is the
/// `"detail"` string when present, the serialized `detail` value when it is
/// not a string, and the whole body otherwise.
#[must_use]
pub fn remote_error_detail(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?.trim();
    if !text.starts_with('{') {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;
    Some(match object.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(other) => other.to_string(),
        None => text.to_owned(),
    })
}

/// Decide whether an HTTP response carries an archive or an error.
///
/// A JSON content type or a non-success status is an error; its message
/// comes from [`remote_error_detail`], then the raw body text, then the
/// status code.
pub fn classify_response(
    status: u16,
    content_type: Option<&str>,
    body: Vec<u8>,
) -> Result<Vec<u8>, LoadError> {
    let is_json = content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
    });
    let success = (200..300).contains(&status);
    if success && !is_json {
        return Ok(body);
    }

    let message = remote_error_detail(&body).unwrap_or_else(|| {
        let text = String::from_utf8_lossy(&body).trim().to_owned();
        if text.is_empty() {
            format!("model service returned HTTP {status}")
        } else {
            text
        }
    });
    Err(LoadError::Remote(message))
}
