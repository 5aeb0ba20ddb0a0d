//! Uploaded product-image persistence
//!
//! Files are written under unique names before the product transaction runs;
//! the caller removes them again if that transaction rolls back, so a failed
//! create leaves no orphan files on disk.

use std::path::Path;

use crate::error::{AppError, ErrorCode};

/// Maximum images per product
pub const MAX_IMAGES: usize = 5;

/// Maximum file size (5 MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted image extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Validate an uploaded file's name and size, returning its lowercase extension
pub fn validate_upload(original_filename: &str, size: usize) -> Result<String, AppError> {
    let ext = Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Solo se admiten archivos de imagen (jpeg, jpg, png, gif)",
        ));
    }

    if size == 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Archivo vacío",
        ));
    }

    if size > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            format!("Archivo demasiado grande ({size} bytes, máximo {MAX_FILE_SIZE})"),
        ));
    }

    Ok(ext)
}

/// Write one image under a fresh uuid-based name; returns the stored filename
pub fn save_image(dir: &Path, ext: &str, data: &[u8]) -> Result<String, AppError> {
    let filename = format!("{}.{ext}", uuid::Uuid::new_v4());
    std::fs::write(dir.join(&filename), data).map_err(|e| {
        tracing::error!(error = %e, "Failed to write uploaded image");
        AppError::new(ErrorCode::InternalError)
    })?;
    Ok(filename)
}

/// Best-effort removal of already-written files after a rolled-back create
pub fn remove_images(dir: &Path, filenames: &[String]) {
    for filename in filenames {
        if let Err(e) = std::fs::remove_file(dir.join(filename)) {
            tracing::warn!(%filename, error = %e, "Failed to remove orphaned image file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_known_extensions() {
        assert_eq!(validate_upload("phone.JPG", 100).unwrap(), "jpg");
        assert_eq!(validate_upload("a.b.png", 100).unwrap(), "png");
    }

    #[test]
    fn validate_rejects_bad_uploads() {
        assert!(validate_upload("malware.exe", 100).is_err());
        assert!(validate_upload("noextension", 100).is_err());
        assert!(validate_upload("ok.png", 0).is_err());
        assert!(validate_upload("big.png", MAX_FILE_SIZE + 1).is_err());
    }

    #[test]
    fn save_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let name = save_image(dir.path(), "png", b"fake-png-bytes").unwrap();
        assert!(name.ends_with(".png"));
        let path = dir.path().join(&name);
        assert_eq!(std::fs::read(&path).unwrap(), b"fake-png-bytes");

        remove_images(dir.path(), std::slice::from_ref(&name));
        assert!(!path.exists());
    }

    #[test]
    fn saved_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = save_image(dir.path(), "jpg", b"one").unwrap();
        let b = save_image(dir.path(), "jpg", b"two").unwrap();
        assert_ne!(a, b);
    }
}
