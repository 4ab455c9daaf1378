//! Conversion of uploaded bytes into embeddable data references.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use assethub_core::result::AppResult;

use super::source::UploadFile;

/// Fallback MIME type for unknown extensions.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Turns one uploaded file into a string the editor can render.
#[async_trait]
pub trait AssetEncoder: Send + Sync + std::fmt::Debug + 'static {
    /// Encode the file into an embeddable data reference.
    async fn encode(&self, file: &UploadFile) -> AppResult<String>;
}

/// Encodes files as `data:<mime>;base64,<payload>` URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriEncoder;

#[async_trait]
impl AssetEncoder for DataUriEncoder {
    async fn encode(&self, file: &UploadFile) -> AppResult<String> {
        let mime = mime_from_name(&file.name).unwrap_or(DEFAULT_MIME);
        let payload = STANDARD.encode(&file.bytes);
        Ok(format!("data:{mime};base64,{payload}"))
    }
}

/// Guess a MIME type from the file extension.
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    let mime = match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_name() {
        assert_eq!(mime_from_name("photo.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_name("a.b.png"), Some("image/png"));
        assert_eq!(mime_from_name("README"), None);
        assert_eq!(mime_from_name("archive.tar"), None);
    }

    #[tokio::test]
    async fn test_data_uri() {
        let file = UploadFile::new("a.png", &b"hello"[..]);
        let uri = DataUriEncoder.encode(&file).await.unwrap();
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn test_unknown_extension_uses_octet_stream() {
        let file = UploadFile::new("blob", &b"\x00\x01"[..]);
        let uri = DataUriEncoder.encode(&file).await.unwrap();
        assert_eq!(uri, "data:application/octet-stream;base64,AAE=");
    }
}
