//! Client-side file acceptance rules for the upload area.

/// MIME types the backend knows how to process.
const SUPPORTED_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/x-markdown",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/tiff",
    "image/bmp",
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/mp4",
    "audio/x-m4a",
    "audio/ogg",
    "audio/flac",
];

/// Extension fallback for browsers that report a missing or generic MIME type.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".pdf", ".docx", ".jpg", ".jpeg", ".png", ".tiff", ".bmp", ".mp3", ".wav",
    ".m4a", ".ogg", ".flac",
];

/// Either the MIME type or the extension has to match; the browser's MIME
/// detection is unreliable for dropped files.
pub fn is_supported_file(file_name: &str, mime_type: &str) -> bool {
    if SUPPORTED_MIME_TYPES
        .iter()
        .any(|mime| mime.eq_ignore_ascii_case(mime_type))
    {
        return true;
    }
    let name = file_name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Display icon for a result card, picked by file extension.
pub fn file_icon(file_name: &str) -> &'static str {
    let name = file_name.to_ascii_lowercase();
    if name.ends_with(".pdf") {
        "📕"
    } else if name.ends_with(".docx") {
        "📘"
    } else if name.ends_with(".txt") {
        "📝"
    } else if name.ends_with(".md") {
        "📋"
    } else if [".jpg", ".jpeg", ".png", ".tiff", ".bmp"]
        .iter()
        .any(|ext| name.ends_with(ext))
    {
        "🖼️"
    } else if [".mp3", ".wav", ".m4a", ".ogg", ".flac"]
        .iter()
        .any(|ext| name.ends_with(ext))
    {
        "🎧"
    } else {
        "📄"
    }
}
