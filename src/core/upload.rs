//! Product image storage.
//!
//! Uploaded files land in a single flat directory. The client's filename is
//! reduced to a safe ASCII form and prefixed with a random token, so two uploads
//! never write the same file and no name can climb out of the directory.

use crate::errors::Result;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

/// URL prefix under which stored images are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const FALLBACK_NAME: &str = "upload";

/// Reduces a client-supplied filename to `[A-Za-z0-9._-]`.
///
/// Path separators become spaces, other characters are dropped, whitespace runs
/// collapse to a single `_`, and leading or trailing `.`/`_` are stripped. A name
/// with nothing left becomes `upload`.
#[must_use]
pub fn sanitize_filename(original: &str) -> String {
    let spaced: String = original
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Builds a collision-resistant on-disk name for an upload.
#[must_use]
pub fn storage_name(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(original))
}

/// Writes `bytes` into `upload_dir` and returns the public URL of the file.
///
/// # Errors
/// Returns an I/O error if the directory cannot be created or the file cannot be written.
#[instrument(skip(upload_dir, bytes), fields(size = bytes.len()))]
pub async fn store_image(upload_dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let name = storage_name(original_name);
    let path = upload_dir.join(&name);
    tokio::fs::write(&path, bytes).await?;
    info!("Stored image '{original_name}' as {}", path.display());
    Ok(format!("{UPLOADS_URL_PREFIX}/{name}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("rose-oud.png"), "rose-oud.png");
        assert_eq!(sanitize_filename("My cool perfume.jpg"), "My_cool_perfume.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\..\\windows\\win.ini"), "windows_win.ini");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("عطر.png"), "png");
        assert_eq!(sanitize_filename("../.."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_storage_names_are_unique() {
        let first = storage_name("photo.png");
        let second = storage_name("photo.png");
        assert_ne!(first, second);
        assert!(first.ends_with("_photo.png"));
    }

    #[tokio::test]
    async fn test_store_image_stays_inside_upload_dir() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("rawaj-upload-{}", Uuid::new_v4()));

        let url = store_image(&dir, "../../etc/passwd", b"not really").await?;

        let name = url.strip_prefix("/uploads/").unwrap();
        assert!(name.ends_with("_etc_passwd"));
        assert!(!name.contains('/'));
        let stored = dir.join(name);
        assert_eq!(stored.parent().unwrap(), dir.as_path());
        assert_eq!(tokio::fs::read(&stored).await?, b"not really");

        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }
}
