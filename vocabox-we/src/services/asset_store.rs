//! Local image asset storage
//!
//! Downloads a word's illustration, normalizes it to a fixed square
//! raster, and writes it under the assets root at a path derived only
//! from the word's text. Re-storing the same word always resolves to the
//! same file, so concurrent enrichment of one word degenerates to a
//! harmless overwrite with identical content.

use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Normalized image edge length in pixels.
const IMAGE_EDGE_PX: u32 = 300;
/// JPEG re-encode quality.
const JPEG_QUALITY: u8 = 80;
/// Bucket for words whose first character is not ASCII alphabetic.
const OTHER_BUCKET: &str = "other";
/// URL prefix under which the assets root is served.
const ASSET_URL_PREFIX: &str = "/assets";

/// Asset store errors. Internal only: callers of [`AssetStore::store_image`]
/// see `None`, never an error.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Download error: {0}")]
    Download(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Unusable file name for word: {0:?}")]
    BadName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Deterministic on-disk image store bucketed by first letter.
pub struct AssetStore {
    root: PathBuf,
    http_client: reqwest::Client,
}

impl AssetStore {
    /// Create a store rooted at `root` (the directory served as `/assets`).
    pub fn new(root: PathBuf, timeout: Duration) -> Result<Self, AssetError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssetError::Download(e.to_string()))?;

        Ok(Self { root, http_client })
    }

    /// Download, normalize, and persist the image for `word`.
    ///
    /// Returns the public URL path of the stored file, or `None` on any
    /// failure; callers keep the remote URL in that case.
    pub async fn store_image(&self, word: &str, source_url: &str) -> Option<String> {
        let bytes = match self.download(source_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(word = %word, url = %source_url, error = %e, "Image download failed");
                return None;
            }
        };

        match self.write_normalized(word, &bytes) {
            Ok(url_path) => {
                tracing::debug!(word = %word, path = %url_path, "Stored word image");
                Some(url_path)
            }
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "Image processing failed");
                None
            }
        }
    }

    /// Public URL path the image for `word` would be stored at.
    pub fn url_path_for(word: &str) -> Option<String> {
        let name = sanitize_file_name(word)?;
        let bucket = bucket_for(word);
        Some(format!("{}/images/{}/{}.jpg", ASSET_URL_PREFIX, bucket, name))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssetError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Decode, resize to the fixed square, re-encode as JPEG, and write to
    /// the word's deterministic path. Split from the download so the
    /// processing path is testable without a network.
    fn write_normalized(&self, word: &str, bytes: &[u8]) -> Result<String, AssetError> {
        let name =
            sanitize_file_name(word).ok_or_else(|| AssetError::BadName(word.to_string()))?;
        let bucket = bucket_for(word);

        let img = image::load_from_memory(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
        let resized = img.resize_exact(IMAGE_EDGE_PX, IMAGE_EDGE_PX, FilterType::Lanczos3);
        // JPEG carries no alpha channel
        let rgb = resized.to_rgb8();

        let dir = self.root.join("images").join(&bucket);
        std::fs::create_dir_all(&dir)?;
        let file_path = dir.join(format!("{}.jpg", name));

        let mut out = std::fs::File::create(&file_path)?;
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| AssetError::Encode(e.to_string()))?;

        Ok(format!(
            "{}/images/{}/{}.jpg",
            ASSET_URL_PREFIX, bucket, name
        ))
    }

    /// Filesystem path backing a stored url path (for tests/inspection).
    pub fn file_path(&self, word: &str) -> Option<PathBuf> {
        let name = sanitize_file_name(word)?;
        Some(
            self.root
                .join("images")
                .join(bucket_for(word))
                .join(format!("{}.jpg", name)),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Bucket directory: lowercase first ASCII-alphabetic character of the
/// word, or a fixed bucket for everything else.
fn bucket_for(word: &str) -> String {
    match word.trim().chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_lowercase().to_string(),
        _ => OTHER_BUCKET.to_string(),
    }
}

/// Reduce a word to a safe file stem: lowercase ASCII alphanumerics with
/// hyphens for everything else. Path separators and traversal sequences
/// cannot survive this mapping. Returns `None` when nothing usable remains.
fn sanitize_file_name(word: &str) -> Option<String> {
    let mut name = String::new();
    let mut last_dash = true; // suppress leading dashes
    for c in word.trim().chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            name.push('-');
            last_dash = true;
        }
    }
    while name.ends_with('-') {
        name.pop();
    }
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, AssetStore) {
        let tmp = TempDir::new().unwrap();
        let store = AssetStore::new(tmp.path().to_path_buf(), Duration::from_millis(200)).unwrap();
        (tmp, store)
    }

    /// Minimal valid 1x1 PNG for decode tests.
    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(1, 1, image::Rgb([200, 100, 50]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn bucket_is_first_letter_lowercased() {
        assert_eq!(bucket_for("Apple"), "a");
        assert_eq!(bucket_for("zebra"), "z");
    }

    #[test]
    fn non_alphabetic_words_bucket_to_other() {
        assert_eq!(bucket_for("42nd"), "other");
        assert_eq!(bucket_for("苹果"), "other");
        assert_eq!(bucket_for(""), "other");
    }

    #[test]
    fn sanitize_strips_separators_and_traversal() {
        assert_eq!(sanitize_file_name("apple"), Some("apple".to_string()));
        assert_eq!(sanitize_file_name("Ice Cream"), Some("ice-cream".to_string()));
        assert_eq!(
            sanitize_file_name("../../etc/passwd"),
            Some("etc-passwd".to_string())
        );
        assert_eq!(sanitize_file_name("a/b\\c"), Some("a-b-c".to_string()));
        assert_eq!(sanitize_file_name("///"), None);
        assert_eq!(sanitize_file_name(""), None);
    }

    #[test]
    fn normalized_write_is_deterministic() {
        let (_tmp, store) = test_store();
        let bytes = tiny_png();

        let first = store.write_normalized("Apple", &bytes).unwrap();
        let second = store.write_normalized("Apple", &bytes).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "/assets/images/a/apple.jpg");

        // Exactly one file on disk
        let dir = store.root().join("images").join("a");
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 1);
    }

    #[test]
    fn normalized_image_is_square_jpeg() {
        let (_tmp, store) = test_store();
        store.write_normalized("pear", &tiny_png()).unwrap();

        let path = store.file_path("pear").unwrap();
        let stored = image::open(path).unwrap();
        assert_eq!(stored.width(), IMAGE_EDGE_PX);
        assert_eq!(stored.height(), IMAGE_EDGE_PX);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let (_tmp, store) = test_store();
        let err = store.write_normalized("apple", b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
    }

    #[test]
    fn unusable_word_is_rejected_before_io() {
        let (_tmp, store) = test_store();
        let err = store.write_normalized("///", &tiny_png()).unwrap_err();
        assert!(matches!(err, AssetError::BadName(_)));
    }

    #[tokio::test]
    async fn download_failure_yields_none() {
        let (_tmp, store) = test_store();
        // Unroutable address: connection fails inside the bounded timeout
        let result = store
            .store_image("apple", "http://127.0.0.1:1/nothing.png")
            .await;
        assert_eq!(result, None);
    }

    #[test]
    fn url_path_matches_write_path() {
        let (_tmp, store) = test_store();
        let written = store.write_normalized("Grape", &tiny_png()).unwrap();
        assert_eq!(AssetStore::url_path_for("Grape"), Some(written));
    }
}
