//! Input limits and validation helpers shared by handlers and the CSV importer.

use crate::error::CoreError;
use crate::guest_csv::LIST_SEPARATOR;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length (in characters) of a project, guest, companion, or document name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of free-text observations on a guest.
pub const MAX_OBSERVATIONS_LENGTH: usize = 2_000;

/// Maximum size of a project cover image (5 MiB).
pub const MAX_PROJECT_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum decoded size of an uploaded document (10 MiB).
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Content type assumed for documents uploaded without one.
pub const DEFAULT_DOCUMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content types served inline on download. Anything else is an attachment.
const INLINE_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/webp",
    "text/plain",
];

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Trim a name and check it is non-empty and within [`MAX_NAME_LENGTH`].
///
/// Returns the trimmed name on success. Line breaks, tabs and other control
/// characters are rejected anywhere in the name.
pub fn validate_name(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(CoreError::Validation(format!(
            "{field} must not contain control characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// [`validate_name`] plus a ban on `;`, which separates companions in the
/// guest CSV.
pub fn validate_companion_name(field: &str, value: &str) -> Result<String, CoreError> {
    let name = validate_name(field, value)?;
    if name.contains(LIST_SEPARATOR) {
        return Err(CoreError::Validation(format!(
            "{field} must not contain '{LIST_SEPARATOR}'"
        )));
    }
    Ok(name)
}

/// Child counts are stored as non-negative integers.
pub fn validate_child_count(field: &str, value: i32) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Images and documents
// ---------------------------------------------------------------------------

/// Check a project cover image against the size limit and content type.
pub fn validate_project_image(content_type: &str, size: usize) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Image is empty".into()));
    }
    if size > MAX_PROJECT_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "Image must be at most {} MB",
            MAX_PROJECT_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    if !content_type.starts_with("image/") {
        return Err(CoreError::Validation(format!(
            "Unsupported image content type '{content_type}'"
        )));
    }
    Ok(())
}

/// Build the `data:` URL a project image is stored as.
pub fn image_data_url(content_type: &str, base64_payload: &str) -> String {
    format!("data:{content_type};base64,{base64_payload}")
}

/// Check decoded document content against [`MAX_DOCUMENT_BYTES`].
pub fn validate_document_size(size: usize) -> Result<(), CoreError> {
    if size > MAX_DOCUMENT_BYTES {
        return Err(CoreError::Validation(format!(
            "Document must be at most {} MB",
            MAX_DOCUMENT_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// RFC 7230 `tchar`, the alphabet of MIME type and subtype names.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// The lowercased `type/subtype` part of a content type, without parameters.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Check that a document content type is a well-formed `type/subtype`,
/// optionally followed by `;`-parameters in printable ASCII.
///
/// Returns the value with its type lowercased and surrounding whitespace
/// removed.
pub fn validate_content_type(value: &str) -> Result<String, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid content type '{}'", value.escape_debug()));

    let (mime, params) = match value.trim().split_once(';') {
        Some((mime, params)) => (mime.trim(), Some(params)),
        None => (value.trim(), None),
    };
    let (kind, subtype) = mime.split_once('/').ok_or_else(invalid)?;
    if kind.is_empty()
        || subtype.is_empty()
        || !kind.chars().all(is_token_char)
        || !subtype.chars().all(is_token_char)
    {
        return Err(invalid());
    }

    let mime = mime.to_ascii_lowercase();
    match params {
        None => Ok(mime),
        Some(params) => {
            if !params.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
                return Err(invalid());
            }
            Ok(format!("{mime};{params}"))
        }
    }
}

/// Whether a document of this content type should be served inline
/// rather than as an attachment.
pub fn is_inline_content_type(content_type: &str) -> bool {
    INLINE_CONTENT_TYPES.contains(&essence(content_type).as_str())
}

/// Only `http` and `https` links may be stored as external documents.
pub fn validate_document_url(url: &str) -> Result<(), CoreError> {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Document url must start with http:// or https://".into(),
        ))
    }
}
