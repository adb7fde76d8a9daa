use mailparse::{MailHeaderMap, ParsedMail};
use thiserror::Error;

use crate::domain::now_epoch;
use crate::domain::page::{Header, Page, PageBody};
use crate::mail::decoders::{content_kind_and_charset, header_block_start};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("message has no Message-ID header")]
    MissingMessageId,
    #[error("message has no usable body part")]
    NoBodyPart,
    #[error("malformed message: {0}")]
    Malformed(#[from] mailparse::MailParseError),
}

/// Parse one raw RFC-5322 message into a page.
///
/// Leading non-header lines (a mailbox "From " envelope, MTA chatter) are
/// skipped before the real header block. The Date header is optional and
/// falls back to the current time; a missing Message-ID is fatal.
pub fn parse_page(raw: &[u8]) -> Result<Page, ParseError> {
    let parsed = mailparse::parse_mail(&raw[header_block_start(raw)..])?;

    let id = parsed
        .headers
        .get_first_value("Message-ID")
        .map(|v| strip_angle_brackets(v.trim()).to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ParseError::MissingMessageId)?;

    let timestamp = parsed
        .headers
        .get_first_value("Date")
        .and_then(|d| mailparse::dateparse(&d).ok())
        .unwrap_or_else(now_epoch);

    let sender = parsed.headers.get_first_value("From").unwrap_or_default();
    let subject = parsed.headers.get_first_value("Subject").unwrap_or_default();

    let part = select_body_part(&parsed).ok_or(ParseError::NoBodyPart)?;
    let declared = part
        .headers
        .get_first_value("Content-Type")
        .unwrap_or_else(|| "text/plain; charset=utf-8".to_string());
    let (kind, _charset) = content_kind_and_charset(&declared);

    let body = if kind.is_binary() {
        PageBody::Binary(part.get_body_raw()?)
    } else {
        PageBody::Text(part.get_body()?)
    };

    let headers = parsed
        .headers
        .iter()
        .map(|h| Header {
            name: h.get_key(),
            value: h.get_value(),
        })
        .collect();

    Ok(Page {
        id,
        timestamp,
        sender,
        subject,
        kind,
        headers,
        body,
    })
}

fn strip_angle_brackets(id: &str) -> &str {
    let id = id.strip_prefix('<').unwrap_or(id);
    id.strip_suffix('>').unwrap_or(id)
}

/// A single-part message is its own body part whatever its type. A multipart
/// message yields its first html leaf, falling back to the first plain one.
fn select_body_part<'a, 'b>(msg: &'a ParsedMail<'b>) -> Option<&'a ParsedMail<'b>> {
    if msg.subparts.is_empty() {
        return Some(msg);
    }
    find_leaf(msg, "text/html").or_else(|| find_leaf(msg, "text/plain"))
}

fn find_leaf<'a, 'b>(part: &'a ParsedMail<'b>, mime: &str) -> Option<&'a ParsedMail<'b>> {
    if part.subparts.is_empty() && part.ctype.mimetype.eq_ignore_ascii_case(mime) {
        return Some(part);
    }
    part.subparts.iter().find_map(|sp| find_leaf(sp, mime))
}
