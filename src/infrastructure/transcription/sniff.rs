//! Magic-byte content classification for candidate audio files

/// How many bytes of the file header to inspect
pub const HEADER_LEN: usize = 512;

/// Classify a file header into a MIME type by its magic bytes.
/// Covers the container formats the transcription endpoint accepts.
pub fn detect_mime(header: &[u8]) -> Option<&'static str> {
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WAVE" {
        return Some("audio/wav");
    }
    if header.starts_with(b"ID3") {
        return Some("audio/mpeg");
    }
    // raw MPEG audio frame sync
    if header.len() >= 2 && header[0] == 0xFF && (header[1] & 0xE0) == 0xE0 {
        return Some("audio/mpeg");
    }
    if header.starts_with(b"fLaC") {
        return Some("audio/flac");
    }
    if header.starts_with(b"OggS") {
        return Some("audio/ogg");
    }
    // EBML header, WebM/Matroska
    if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("video/webm");
    }
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return Some(match &header[8..12] {
            b"M4A " | b"M4B " => "audio/mp4",
            _ => "video/mp4",
        });
    }
    None
}

/// Whether a MIME type is in the accepted `audio/*` / `video/*` families
pub fn is_allowed_media(mime: &str) -> bool {
    mime.starts_with("audio/") || mime.starts_with("video/")
}
