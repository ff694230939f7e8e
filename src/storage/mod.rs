use std::io::Cursor;
use std::path::PathBuf;

use uuid::Uuid;

use crate::error::AppError;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Uploaded images are downscaled so neither dimension exceeds this.
const MAX_DIMENSION: u32 = 800;
const JPEG_QUALITY: u8 = 85;

/// Local-disk store for uploaded photos. Files are normalized in memory and
/// written exactly once, so a failed decode never leaves anything on disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    max_bytes: usize,
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn allowed_file(filename: &str) -> bool {
    matches!(extension(filename), Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduce a client-supplied filename to its final path component with only
/// `[A-Za-z0-9._-]` characters, leading and trailing dots stripped.
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Decode, downscale to fit `MAX_DIMENSION` (never enlarging, aspect ratio
/// preserved) and re-encode in the format the extension names.
fn normalize_image(data: &[u8], ext: &str) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::BadRequest(format!("failed to process image: {e}")))?;

    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        img
    };

    let mut out = Vec::new();
    match ext {
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
            rgb.write_with_encoder(encoder)
                .map_err(|e| AppError::Internal(format!("failed to encode image: {e}")))?;
        }
        "gif" => {
            img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Gif)
                .map_err(|e| AppError::Internal(format!("failed to encode image: {e}")))?;
        }
        _ => {
            img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
                .map_err(|e| AppError::Internal(format!("failed to encode image: {e}")))?;
        }
    }
    Ok(out)
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, max_bytes })
    }

    /// Validate, normalize and persist an uploaded image. Returns the stored
    /// filename, unique per upload via a uuid prefix.
    pub async fn save_image(
        &self,
        original_filename: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        if !allowed_file(original_filename) {
            return Err(AppError::BadRequest("invalid file type".into()));
        }
        if data.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "file exceeds {} bytes",
                self.max_bytes
            )));
        }

        let ext = extension(original_filename).unwrap_or_default();
        let normalized = normalize_image(data, &ext)?;

        let stored = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_filename));
        tokio::fs::write(self.root.join(&stored), normalized)
            .await
            .map_err(|e| AppError::Internal(format!("failed to store file: {e}")))?;
        Ok(stored)
    }

    /// Read back a stored file by its stored filename.
    pub async fn load(&self, stored_filename: &str) -> Result<Vec<u8>, AppError> {
        // stored names never contain path separators
        if stored_filename.contains(['/', '\\']) || stored_filename.contains("..") {
            return Err(AppError::NotFound("file not found".into()));
        }
        match tokio::fs::read(self.root.join(stored_filename)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("file not found".into()))
            }
            Err(e) => Err(AppError::Internal(format!("failed to read file: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(max_bytes: usize) -> LocalStorage {
        let dir = std::env::temp_dir().join(format!("bird-finder-test-{}", Uuid::new_v4()));
        LocalStorage::new(dir, max_bytes).unwrap()
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([20, 180, 40]),
        ));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("photo.png"));
        assert!(allowed_file("photo.JPG"));
        assert!(allowed_file("a.b.jpeg"));
        assert!(allowed_file("anim.gif"));
        assert!(!allowed_file("virus.exe"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("archive.png.zip"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("C:\\temp\\shot.jpg"), "shot.jpg");
        assert_eq!(sanitize_filename("my bird (1).png"), "my_bird__1_.png");
        assert_eq!(sanitize_filename("..."), "file");
    }

    #[test]
    fn test_normalize_shrinks_to_fit() {
        let out = normalize_image(&png_bytes(1000, 500), "png").unwrap();
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (800, 400));
    }

    #[test]
    fn test_normalize_never_enlarges() {
        let out = normalize_image(&png_bytes(100, 50), "png").unwrap();
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (100, 50));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let err = normalize_image(b"definitely not an image", "png").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_bad_extension_without_writing() {
        let store = temp_store(1024 * 1024);
        let err = store.save_image("virus.exe", &png_bytes(10, 10)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(std::fs::read_dir(&store.root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_save_rejects_oversize_without_writing() {
        let data = png_bytes(64, 64);
        let store = temp_store(data.len() - 1);
        let err = store.save_image("photo.png", &data).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert_eq!(std::fs::read_dir(&store.root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_save_rejects_undecodable_without_writing() {
        let store = temp_store(1024 * 1024);
        let err = store.save_image("photo.png", b"garbage").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(std::fs::read_dir(&store.root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let store = temp_store(16 * 1024 * 1024);
        let stored = store
            .save_image("photo.png", &png_bytes(1200, 900))
            .await
            .unwrap();
        assert!(stored.ends_with("_photo.png"));

        let data = store.load(&stored).await.unwrap();
        let img = image::load_from_memory(&data).unwrap();
        assert!(img.width() <= 800 && img.height() <= 800);
    }

    #[tokio::test]
    async fn test_load_missing_and_traversal() {
        let store = temp_store(1024);
        assert!(matches!(
            store.load("nope.png").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            store.load("../secret.png").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
