//! Media classification by file extension

/// Upload profile of an asset, sent as `fileType` to `/upload/prepare`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Images (`1`)
    Image,
    /// Audio and video (`2`)
    AudioVideo,
    /// PDF documents (`3`)
    Document,
}

impl MediaType {
    /// Numeric code used on the wire
    pub fn code(self) -> u8 {
        match self {
            MediaType::Image => 1,
            MediaType::AudioVideo => 2,
            MediaType::Document => 3,
        }
    }

    /// Classify a (case-insensitive) extension. Unknown extensions upload as
    /// images.
    pub fn from_extension(extension: &str) -> Self {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp3" | "mp4" | "m4a" | "wav" | "ogg" | "mov" | "webm" => MediaType::AudioVideo,
            "pdf" => MediaType::Document,
            _ => MediaType::Image,
        }
    }
}

/// MIME type for the multipart `file` part
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
