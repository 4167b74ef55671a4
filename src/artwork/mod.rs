//! Embedded cover art, exposed to clients as a `data:` URI.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lofty::file::TaggedFileExt;
use lofty::read_from_path;
use std::path::Path;
use tracing::debug;

pub trait ArtworkSource: Send + Sync {
    /// Artwork URI for the given audio file, or `None` when the file carries none.
    fn data_uri(&self, path: &Path) -> Option<String>;
}

/// Reads the first embedded picture with lofty.
pub struct EmbeddedArtwork;

impl ArtworkSource for EmbeddedArtwork {
    fn data_uri(&self, path: &Path) -> Option<String> {
        let (mime, data) = read_embedded_picture(path)?;
        Some(encode_data_uri(&mime, &data))
    }
}

/// Used when artwork lookup is disabled in the configuration.
pub struct NoArtwork;

impl ArtworkSource for NoArtwork {
    fn data_uri(&self, _path: &Path) -> Option<String> {
        None
    }
}

fn read_embedded_picture(path: &Path) -> Option<(String, Vec<u8>)> {
    let tagged_file = match read_from_path(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("No tags for {}: {e}", path.display());
            return None;
        }
    };

    let picture = tagged_file
        .primary_tag()
        .and_then(|tag| tag.pictures().first())
        .or_else(|| {
            tagged_file
                .tags()
                .iter()
                .find_map(|tag| tag.pictures().first())
        })?;

    let mime = picture
        .mime_type()
        .map(|mime| mime.as_str().to_string())
        .unwrap_or_else(|| sniff_mime(picture.data()).to_string());

    Some((mime, picture.data().to_vec()))
}

fn sniff_mime(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else {
        "image/jpeg"
    }
}

pub fn encode_data_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}
