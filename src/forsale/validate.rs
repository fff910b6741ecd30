use super::types::{Advisory, TagError, TagKind, ValidatedTag, Violation};

/// Maximum fcod/ftxt value length in octets.
pub const MAX_VALUE_LEN: usize = 239;

/// furi schemes that carry no advisory.
pub const RECOMMENDED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

const UNSAFE_SCHEMES: [&str; 2] = ["javascript", "data"];

/// A validated tag plus any non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub tag: ValidatedTag,
    pub advisories: Vec<Advisory>,
}

/// Validate a raw tag value for the given kind.
pub fn validate_tag(kind: TagKind, value: &str) -> Result<Validated, TagError> {
    match kind {
        TagKind::Fcod => validate_fcod(value).map(|tag| Validated {
            tag,
            advisories: Vec::new(),
        }),
        TagKind::Ftxt => validate_ftxt(value).map(|tag| Validated {
            tag,
            advisories: Vec::new(),
        }),
        TagKind::Furi => validate_furi(value),
    }
}

/// fcod-value = 1*239 VCHAR (0x20-0x7E).
pub fn validate_fcod(value: &str) -> Result<ValidatedTag, TagError> {
    let violations = bounded_value_violations(value, is_fcod_char);
    if !violations.is_empty() {
        return Err(TagError::new(Some(TagKind::Fcod), violations));
    }
    Ok(ValidatedTag::Fcod {
        value: value.to_string(),
    })
}

/// ftxt-value = 1*239 ftxt-char, ftxt-char = %x20-21 / %x23-5B / %x5D-7E.
pub fn validate_ftxt(value: &str) -> Result<ValidatedTag, TagError> {
    let violations = bounded_value_violations(value, is_ftxt_char);
    if !violations.is_empty() {
        return Err(TagError::new(Some(TagKind::Ftxt), violations));
    }
    Ok(ValidatedTag::Ftxt {
        value: value.to_string(),
    })
}

/// furi-value = URI, checked against the practical shape
/// `scheme ":" ["//"] *safe-char`.
///
/// Schemes other than http, https, mailto and tel pass with an advisory.
pub fn validate_furi(value: &str) -> Result<Validated, TagError> {
    if value.is_empty() {
        return Err(TagError::new(Some(TagKind::Furi), vec![Violation::Empty]));
    }

    let mut violations = Vec::new();

    let (scheme, rest) = value.split_once(':').unwrap_or(("", value));
    if scheme.is_empty() {
        violations.push(Violation::MissingScheme);
    } else if !is_valid_scheme(scheme) {
        violations.push(Violation::InvalidScheme {
            scheme: scheme.to_string(),
        });
    }

    let found = disallowed_chars(rest, is_uri_char);
    if !found.is_empty() {
        violations.push(Violation::Characters { found });
    }

    if !violations.is_empty() {
        return Err(TagError::new(Some(TagKind::Furi), violations));
    }

    Ok(Validated {
        tag: ValidatedTag::Furi {
            uri: value.to_string(),
            scheme: scheme.to_string(),
        },
        advisories: scheme_advisories(scheme),
    })
}

/// Whether a scheme is one of the recommended four (case-insensitive).
pub fn is_recommended_scheme(scheme: &str) -> bool {
    RECOMMENDED_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
}

fn scheme_advisories(scheme: &str) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if !is_recommended_scheme(scheme) {
        advisories.push(Advisory::SchemeNotRecommended {
            scheme: scheme.to_string(),
        });
        if UNSAFE_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
            advisories.push(Advisory::UnsafeScheme {
                scheme: scheme.to_string(),
            });
        }
    }
    advisories
}

// Length and character class are checked independently.
fn bounded_value_violations(value: &str, allowed: fn(char) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    let len = value.len();
    if !(1..=MAX_VALUE_LEN).contains(&len) {
        violations.push(Violation::Length { len });
    }
    let found = disallowed_chars(value, allowed);
    if !found.is_empty() {
        violations.push(Violation::Characters { found });
    }
    violations
}

/// Distinct characters failing `allowed`, in order of first appearance.
fn disallowed_chars(value: &str, allowed: fn(char) -> bool) -> Vec<char> {
    let mut found: Vec<char> = Vec::new();
    for c in value.chars() {
        if !allowed(c) && !found.contains(&c) {
            found.push(c);
        }
    }
    found
}

fn is_fcod_char(c: char) -> bool {
    matches!(c, '\x20'..='\x7e')
}

fn is_ftxt_char(c: char) -> bool {
    matches!(c, '\x20'..='\x21' | '\x23'..='\x5b' | '\x5d'..='\x7e')
}

fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "%-._~:/?#[]@!$&'()*+,;=".contains(c)
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
