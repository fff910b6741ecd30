use crate::common::domain::for_sale_name;

use super::parser::VERSION_TAG;
use super::types::{Advisory, TagError, TagKind, ValidatedTag, Violation};
use super::validate::{validate_tag, Validated};

/// Largest record that fits one TXT character-string.
pub const MAX_RECORD_LEN: usize = 255;

/// Result of generating a record from a caller-supplied value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Record text, starting with the version tag.
    pub record: String,
    pub tag: Option<ValidatedTag>,
    pub advisories: Vec<Advisory>,
}

/// Encode a validated tag (or no content) as record text.
///
/// The tag is re-validated first; a tag that would not parse back to
/// itself is rejected rather than emitted.
pub fn encode(tag: Option<&ValidatedTag>) -> Result<String, TagError> {
    let Some(tag) = tag else {
        return Ok(VERSION_TAG.to_string());
    };
    let validated = check_encodable(tag.kind(), tag.value())?;
    if let (
        ValidatedTag::Furi { scheme: found, .. },
        ValidatedTag::Furi {
            scheme: expected, ..
        },
    ) = (tag, &validated.tag)
    {
        if found != expected {
            return Err(TagError::new(
                Some(TagKind::Furi),
                vec![Violation::SchemeMismatch {
                    expected: expected.clone(),
                    found: found.clone(),
                }],
            ));
        }
    }
    Ok(format_record(&validated.tag))
}

/// Validate a value for `kind` and build its record.
///
/// `None` produces the version-tag-only record.
pub fn generate(kind: Option<TagKind>, value: &str) -> Result<Generated, TagError> {
    let Some(kind) = kind else {
        return Ok(Generated {
            record: VERSION_TAG.to_string(),
            tag: None,
            advisories: Vec::new(),
        });
    };
    let Validated { tag, advisories } = check_encodable(kind, value)?;
    Ok(Generated {
        record: format_record(&tag),
        tag: Some(tag),
        advisories,
    })
}

/// Zone-file line publishing `record` for `domain`.
///
/// `"` and `\` are escaped; fcod permits both.
pub fn zone_entry(domain: &str, record: &str) -> String {
    let mut escaped = String::with_capacity(record.len());
    for c in record.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("{}. IN TXT \"{}\"", for_sale_name(domain), escaped)
}

fn format_record(tag: &ValidatedTag) -> String {
    format!("{}{}{}", VERSION_TAG, tag.kind().key(), tag.value())
}

// Tag validation plus the rules that keep a value stable through parsing.
fn check_encodable(kind: TagKind, value: &str) -> Result<Validated, TagError> {
    let mut extra = Vec::new();
    if value.ends_with(char::is_whitespace) {
        extra.push(Violation::TrailingWhitespace);
    }
    for other in TagKind::ALL {
        if value.contains(other.key()) {
            extra.push(Violation::EmbeddedTagKey { kind: other });
        }
    }
    let record_len = VERSION_TAG.len() + kind.key().len() + value.len();
    if record_len > MAX_RECORD_LEN {
        extra.push(Violation::RecordLength { len: record_len });
    }

    match validate_tag(kind, value) {
        Ok(v) if extra.is_empty() => Ok(v),
        Ok(_) => Err(TagError::new(Some(kind), extra)),
        Err(mut e) => {
            e.violations.append(&mut extra);
            Err(e)
        }
    }
}
