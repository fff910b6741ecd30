use std::fmt;

use serde::Serialize;

use super::decode::DecodeError;

/// Content tag kind. Only one may appear per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// For-sale code: short opaque value.
    Fcod,
    /// For-sale text: short free-text description.
    Ftxt,
    /// For-sale URI: pointer to sale or contact information.
    Furi,
}

impl TagKind {
    pub const ALL: [TagKind; 3] = [TagKind::Fcod, TagKind::Ftxt, TagKind::Furi];

    /// Tag name without the `=` separator.
    pub fn name(&self) -> &'static str {
        match self {
            TagKind::Fcod => "fcod",
            TagKind::Ftxt => "ftxt",
            TagKind::Furi => "furi",
        }
    }

    /// Tag key as it appears in a record, including the `=` separator.
    pub fn key(&self) -> &'static str {
        match self {
            TagKind::Fcod => "fcod=",
            TagKind::Ftxt => "ftxt=",
            TagKind::Furi => "furi=",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw TXT record content as returned by a lookup.
///
/// A record published as several character-strings is held concatenated,
/// with the number of strings it arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    bytes: Vec<u8>,
    parts: usize,
}

impl RawRecord {
    /// A record received as one character-string.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        RawRecord {
            bytes: bytes.into(),
            parts: 1,
        }
    }

    /// A record received as `strings`, joined in order.
    pub fn from_parts(strings: Vec<Vec<u8>>) -> Self {
        RawRecord {
            parts: strings.len(),
            bytes: strings.concat(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of character-strings the record was published as.
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Published as exactly one character-string.
    pub fn is_single_string(&self) -> bool {
        self.parts == 1
    }
}

impl From<Vec<u8>> for RawRecord {
    fn from(bytes: Vec<u8>) -> Self {
        RawRecord::new(bytes)
    }
}

impl From<&[u8]> for RawRecord {
    fn from(bytes: &[u8]) -> Self {
        RawRecord::new(bytes)
    }
}

impl From<&str> for RawRecord {
    fn from(text: &str) -> Self {
        RawRecord::new(text)
    }
}

/// A content tag whose value passed its kind's validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum ValidatedTag {
    Fcod { value: String },
    Ftxt { value: String },
    Furi { uri: String, scheme: String },
}

impl ValidatedTag {
    pub fn kind(&self) -> TagKind {
        match self {
            ValidatedTag::Fcod { .. } => TagKind::Fcod,
            ValidatedTag::Ftxt { .. } => TagKind::Ftxt,
            ValidatedTag::Furi { .. } => TagKind::Furi,
        }
    }

    /// The value as it appears after the `key=` marker.
    pub fn value(&self) -> &str {
        match self {
            ValidatedTag::Fcod { value } | ValidatedTag::Ftxt { value } => value,
            ValidatedTag::Furi { uri, .. } => uri,
        }
    }
}

/// Classification of the content following the version tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOccurrence {
    /// Nothing after the version tag.
    Empty,
    /// Content present but no known tag key in it.
    Unparseable(String),
    /// Exactly one tag key. `offset` is its byte position in the content,
    /// `value` everything after the key's `=`.
    Single {
        kind: TagKind,
        offset: usize,
        value: String,
    },
    /// More than one tag key, in order of appearance.
    Multiple(Vec<TagKind>),
}

/// Non-fatal finding attached to an otherwise valid tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "advisory", rename_all = "snake_case")]
pub enum Advisory {
    /// furi scheme is not one of http, https, mailto, tel.
    SchemeNotRecommended { scheme: String },
    /// furi scheme can execute code or embed data.
    UnsafeScheme { scheme: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::SchemeNotRecommended { scheme } => write!(
                f,
                "URI scheme '{}' is not recommended (recommended: http, https, mailto, tel)",
                scheme
            ),
            Advisory::UnsafeScheme { scheme } => write!(
                f,
                "URI scheme '{}' may execute code or embed data; review before following",
                scheme
            ),
        }
    }
}

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// Value byte length outside 1..=239.
    Length { len: usize },
    /// Characters outside the kind's character class, in order of first appearance.
    Characters { found: Vec<char> },
    /// furi value is empty.
    Empty,
    /// furi value has no `scheme:` part.
    MissingScheme,
    /// furi scheme does not match `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
    InvalidScheme { scheme: String },
    /// Content after the version tag holds no known tag key.
    NoContentTag { content: String },
    /// The only tag key does not start the content.
    TagNotAtStart { offset: usize },
    /// Value ends in whitespace, which parsing would strip.
    TrailingWhitespace,
    /// Value contains a tag key, which parsing would count as a second tag.
    EmbeddedTagKey { kind: TagKind },
    /// furi scheme field disagrees with the scheme of the URI.
    SchemeMismatch { expected: String, found: String },
    /// Whole record exceeds one 255-octet character-string.
    RecordLength { len: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Length { len } => write!(
                f,
                "value length is {} octets, but MUST be between 1 and 239 octets",
                len
            ),
            Violation::Characters { found } => {
                f.write_str("value contains disallowed characters: ")?;
                for (i, c) in found.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?} (U+{:04X})", c, *c as u32)?;
                }
                Ok(())
            }
            Violation::Empty => f.write_str("value is empty; it MUST contain exactly one URI"),
            Violation::MissingScheme => f.write_str("URI has no scheme"),
            Violation::InvalidScheme { scheme } => {
                write!(f, "URI scheme '{}' is not syntactically valid", scheme)
            }
            Violation::NoContentTag { content } => write!(
                f,
                "no content tag (fcod=, ftxt=, furi=) found in '{}'",
                content
            ),
            Violation::TagNotAtStart { offset } => {
                write!(f, "content tag found at offset {}, not at the start", offset)
            }
            Violation::TrailingWhitespace => {
                f.write_str("value ends in whitespace, which would be stripped")
            }
            Violation::EmbeddedTagKey { kind } => {
                write!(f, "value contains '{}', which reads as a second tag", kind.key())
            }
            Violation::SchemeMismatch { expected, found } => write!(
                f,
                "scheme '{}' does not match URI scheme '{}'",
                found, expected
            ),
            Violation::RecordLength { len } => write!(
                f,
                "record length is {} octets, but MUST fit one character-string of at most 255 octets",
                len
            ),
        }
    }
}

/// Tag-value validation failure. Carries every rule the value violated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagError {
    /// `None` when no tag kind could be identified.
    pub kind: Option<TagKind>,
    pub violations: Vec<Violation>,
}

impl TagError {
    pub fn new(kind: Option<TagKind>, violations: Vec<Violation>) -> Self {
        Self { kind, violations }
    }

    pub fn has_character_violation(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, Violation::Characters { .. }))
    }
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "invalid {} tag: ", kind)?,
            None => f.write_str("invalid content: ")?,
        }
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl std::error::Error for TagError {}

/// Terminal judgment for one raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// No version tag; the record is outside the microformat.
    NotRecognized,
    /// Version tag only.
    ValidNoContent,
    ValidWithTag {
        tag: ValidatedTag,
        advisories: Vec<Advisory>,
    },
    MalformedMultipleTags { kinds: Vec<TagKind> },
    MalformedTagValue(TagError),
    DecodeFailed(DecodeError),
}

impl RecordOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(
            self,
            RecordOutcome::ValidNoContent | RecordOutcome::ValidWithTag { .. }
        )
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, RecordOutcome::NotRecognized)
    }

    /// Malformed or undecodable.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid() && !self.is_ignored()
    }

    pub fn tag(&self) -> Option<&ValidatedTag> {
        match self {
            RecordOutcome::ValidWithTag { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// What a furi asks the reader to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// http, https
    Visit,
    /// mailto
    Email,
    /// tel
    Call,
    GenericUri,
}

/// Presentation category for a record outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum DisplayCategory {
    NotForSale,
    ForSaleNoDetail,
    ForSaleWithCode { code: String },
    ForSaleWithText { text: String },
    ForSaleAction { kind: ActionKind, target: String },
}

impl DisplayCategory {
    pub fn is_for_sale(&self) -> bool {
        !matches!(self, DisplayCategory::NotForSale)
    }
}
