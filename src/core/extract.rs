/// Tag extraction: pulls `<tag>…</tag>` regions out of a model response.
///
/// The response format is a flat set of named tags with at most one level of
/// uniformly tagged blocks inside a container tag. This is not an XML parser:
/// there are no attributes, namespaces or escapes, and a tag's content ends at
/// the first matching closing tag.

use thiserror::Error;

use crate::schema::relationship::RelationshipStatus;

/// Why a response could not be turned into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("required tag <{0}> is missing")]
    TagMissing(String),
    #[error("tag <{tag}> could not be decoded: {reason}")]
    FieldDecode { tag: String, reason: String },
    #[error("expected {expected} complete {what}, found {found}")]
    Shape {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

impl ExtractError {
    pub fn decode(tag: &str, reason: impl Into<String>) -> Self {
        Self::FieldDecode {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }
}

/// Returns the trimmed content of the first `<tag>…</tag>` in `text`.
///
/// `None` means the tag is absent, which callers must keep apart from a
/// present-but-empty tag (`Some("")`). Matching is case-sensitive and the
/// content runs to the first closing tag after the opening one, across
/// newlines.
pub fn extract_tag<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = text.find(&open)? + open.len();
    let len = text[start..].find(&close)?;
    Some(text[start..start + len].trim())
}

/// Splits the content of a container tag into one raw segment per block.
///
/// Segments end at each occurrence of `terminator` (e.g. `</relationship>`).
/// Blank segments, including the one after a final terminator, are dropped.
/// Absent or blank input yields no blocks.
///
/// Only sound because blocks never nest and no field value contains the
/// terminator literal. Text that breaks either assumption produces
/// misaligned blocks, which then fail field extraction.
pub fn split_blocks<'a>(container: Option<&'a str>, terminator: &str) -> Vec<&'a str> {
    let Some(container) = container else {
        return Vec::new();
    };
    container
        .split(terminator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Lists the distinct tag names that are both opened and closed in `text`,
/// in order of first appearance.
pub fn scan_tag_names(text: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        let start = i + 1;
        let mut end = start;
        while end < bytes.len() && is_name_byte(bytes[end]) {
            end += 1;
        }

        if end > start && end < bytes.len() && bytes[end] == b'>' {
            let name = &text[start..end];
            let close = format!("</{}>", name);
            if !names.contains(&name) && text[end + 1..].contains(&close) {
                names.push(name);
            }
            i = end + 1;
        } else {
            i += 1;
        }
    }

    names
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// The content of a tag that must be present.
pub fn require<'a>(text: &'a str, tag: &str) -> Result<&'a str, ExtractError> {
    extract_tag(text, tag).ok_or_else(|| ExtractError::TagMissing(tag.to_string()))
}

/// The content of a tag that must be present and non-empty.
pub fn require_text(text: &str, tag: &str) -> Result<String, ExtractError> {
    let value = require(text, tag)?;
    if value.is_empty() {
        return Err(ExtractError::decode(tag, "empty"));
    }
    Ok(value.to_string())
}

/// Decodes a literal `true`/`false`, ignoring case and surrounding space.
pub fn require_bool(text: &str, tag: &str) -> Result<bool, ExtractError> {
    let value = require(text, tag)?;
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ExtractError::decode(tag, format!("expected true or false, got '{}'", value)))
    }
}

/// Decodes a non-negative whole-number age.
pub fn require_age(text: &str, tag: &str) -> Result<u32, ExtractError> {
    let value = require(text, tag)?;
    value
        .parse::<u32>()
        .map_err(|_| ExtractError::decode(tag, format!("'{}' is not a whole number", value)))
}

/// Decodes a 1..=10 relationship status. See [`RelationshipStatus::parse`].
pub fn require_status(text: &str, tag: &str) -> Result<RelationshipStatus, ExtractError> {
    let value = require(text, tag)?;
    RelationshipStatus::parse(value).ok_or_else(|| {
        ExtractError::decode(tag, format!("'{}' is not a status from 1 to 10", value))
    })
}
