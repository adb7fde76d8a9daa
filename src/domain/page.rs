use serde::{Deserialize, Serialize};

/// One raw mail header. Order matters, so pages carry these in a Vec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Coarse classification of a page body, derived from the declared media
/// type. Anything that is not `text/*` is binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Plain,
    Binary,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Html => "html",
            ContentKind::Plain => "plain",
            ContentKind::Binary => "binary",
        }
    }

    /// Inverse of `as_str` for values read back from the store. Unknown
    /// labels degrade to `Plain`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "html" => ContentKind::Html,
            "binary" => ContentKind::Binary,
            _ => ContentKind::Plain,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, ContentKind::Binary)
    }
}

/// Decoded text for `html`/`plain` pages, untouched bytes otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    Text(String),
    Binary(Vec<u8>),
}

impl PageBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PageBody::Text(s) => s.as_bytes(),
            PageBody::Binary(b) => b,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    /// Message-ID without its angle-bracket delimiters; primary key.
    pub id: String,
    /// Origination time as epoch seconds.
    pub timestamp: i64,
    pub sender: String,
    pub subject: String,
    pub kind: ContentKind,
    pub headers: Vec<Header>,
    pub body: PageBody,
}
