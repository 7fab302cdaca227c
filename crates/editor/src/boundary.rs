//! Interfaces to the host environment: clipboard, downloads and fullscreen

use base64::{Engine as _, engine::general_purpose::STANDARD};
use files::FileTab;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything outside the URL "unreserved" set is escaped
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// System clipboard
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> eyre::Result<()>;
}

/// A file handed to the host to save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn of(file: &FileTab) -> Self {
        Self {
            file_name: file.key().to_string(),
            mime: "text/plain",
            bytes: file.content.as_bytes().to_vec(),
        }
    }
}

/// Host side of "Download": writes the bytes somewhere the user can find them
pub trait Downloader {
    fn save(&mut self, download: Download) -> eyre::Result<()>;
}

/// Native fullscreen of the editor container. Requests are fire and forget.
pub trait Fullscreen {
    fn request(&mut self);
    fn exit(&mut self);
}

/// Link embedding a snapshot of `file`
///
/// Nothing is stored server side, so the link only resolves on a page that decodes it.
pub fn share_url(base: &str, file: &FileTab) -> String {
    let code = STANDARD.encode(file.content.as_bytes());
    format!(
        "{base}?code={}&lang={}&name={}",
        encode_component(&code),
        file.language,
        encode_component(file.key())
    )
}

fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}
