use super::decode::decode_record;
use super::types::{RecordOutcome, TagError, TagKind, TagOccurrence, Violation};
use super::validate::validate_tag;

/// Mandatory version tag, case-sensitive, at the very start of the record.
pub const VERSION_TAG: &str = "v=FORSALE1;";

/// Strip the version tag from a decoded record.
///
/// Returns the content after the tag with surrounding whitespace removed,
/// or `None` when the record does not start with the exact version tag.
pub fn strip_version(record: &str) -> Option<&str> {
    record.strip_prefix(VERSION_TAG).map(str::trim)
}

/// Classify content by counting tag keys anywhere in it.
pub fn split_tags(content: &str) -> TagOccurrence {
    let mut found: Vec<(usize, TagKind)> = TagKind::ALL
        .iter()
        .flat_map(|&kind| content.match_indices(kind.key()).map(move |(pos, _)| (pos, kind)))
        .collect();
    found.sort();

    match found.as_slice() {
        [] if content.is_empty() => TagOccurrence::Empty,
        [] => TagOccurrence::Unparseable(content.to_string()),
        [(offset, kind)] => TagOccurrence::Single {
            kind: *kind,
            offset: *offset,
            value: content[offset + kind.key().len()..].to_string(),
        },
        _ => TagOccurrence::Multiple(found.iter().map(|&(_, kind)| kind).collect()),
    }
}

/// Evaluate the content following a recognized version tag.
pub fn evaluate_content(content: &str) -> RecordOutcome {
    match split_tags(content) {
        TagOccurrence::Empty => RecordOutcome::ValidNoContent,
        TagOccurrence::Unparseable(content) => RecordOutcome::MalformedTagValue(TagError::new(
            None,
            vec![Violation::NoContentTag { content }],
        )),
        TagOccurrence::Single { kind, offset, .. } if offset != 0 => {
            RecordOutcome::MalformedTagValue(TagError::new(
                Some(kind),
                vec![Violation::TagNotAtStart { offset }],
            ))
        }
        TagOccurrence::Single { kind, value, .. } => match validate_tag(kind, &value) {
            Ok(v) => RecordOutcome::ValidWithTag {
                tag: v.tag,
                advisories: v.advisories,
            },
            Err(e) => RecordOutcome::MalformedTagValue(e),
        },
        TagOccurrence::Multiple(kinds) => RecordOutcome::MalformedMultipleTags { kinds },
    }
}

/// Evaluate a decoded record.
pub fn evaluate_text(record: &str) -> RecordOutcome {
    match strip_version(record) {
        Some(content) => evaluate_content(content),
        None => RecordOutcome::NotRecognized,
    }
}

/// Evaluate one raw TXT character-string.
pub fn evaluate(raw: &[u8]) -> RecordOutcome {
    match decode_record(raw) {
        Ok(text) => evaluate_text(&text),
        Err(e) => RecordOutcome::DecodeFailed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forsale::types::{Advisory, ValidatedTag};

    // ─── Version tag ─────────────────────────────────────────────────

    #[test]
    fn version_tag_is_case_sensitive() {
        assert_eq!(evaluate_text("V=forsale1;fcod=X"), RecordOutcome::NotRecognized);
        assert_eq!(evaluate_text("v=forsale1;"), RecordOutcome::NotRecognized);
    }

    #[test]
    fn leading_whitespace_not_tolerated() {
        assert_eq!(evaluate_text(" v=FORSALE1;"), RecordOutcome::NotRecognized);
    }

    #[test]
    fn unrelated_record_ignored() {
        assert_eq!(evaluate_text("v=spf1 -all"), RecordOutcome::NotRecognized);
        assert_eq!(evaluate_text(""), RecordOutcome::NotRecognized);
    }

    #[test]
    fn strip_version_trims_content() {
        assert_eq!(strip_version("v=FORSALE1;  fcod=X  "), Some("fcod=X"));
        assert_eq!(strip_version("v=FORSALE1;"), Some(""));
        assert_eq!(strip_version("v=FORSALE2;"), None);
    }

    #[test]
    fn version_only_is_valid_no_content() {
        assert_eq!(evaluate_text("v=FORSALE1;"), RecordOutcome::ValidNoContent);
        assert_eq!(evaluate_text("v=FORSALE1;   "), RecordOutcome::ValidNoContent);
    }

    // ─── Tag splitting ───────────────────────────────────────────────

    #[test]
    fn split_single_keeps_value_unstripped() {
        assert_eq!(
            split_tags("ftxt= hello"),
            TagOccurrence::Single {
                kind: TagKind::Ftxt,
                offset: 0,
                value: " hello".into()
            }
        );
    }

    #[test]
    fn split_multiple_in_order() {
        assert_eq!(
            split_tags("furi=x ftxt=y fcod=z"),
            TagOccurrence::Multiple(vec![TagKind::Furi, TagKind::Ftxt, TagKind::Fcod])
        );
    }

    #[test]
    fn split_same_key_twice_is_multiple() {
        assert_eq!(
            split_tags("fcod=Afcod=B"),
            TagOccurrence::Multiple(vec![TagKind::Fcod, TagKind::Fcod])
        );
    }

    #[test]
    fn split_unparseable() {
        assert_eq!(
            split_tags("price=100"),
            TagOccurrence::Unparseable("price=100".into())
        );
    }

    // ─── Evaluation ──────────────────────────────────────────────────

    #[test]
    fn fcod_happy_path() {
        assert_eq!(
            evaluate(b"v=FORSALE1;fcod=SALE-123"),
            RecordOutcome::ValidWithTag {
                tag: ValidatedTag::Fcod {
                    value: "SALE-123".into()
                },
                advisories: vec![]
            }
        );
    }

    #[test]
    fn furi_mailto() {
        assert_eq!(
            evaluate(b"v=FORSALE1;furi=mailto:sales@example.com"),
            RecordOutcome::ValidWithTag {
                tag: ValidatedTag::Furi {
                    uri: "mailto:sales@example.com".into(),
                    scheme: "mailto".into()
                },
                advisories: vec![]
            }
        );
    }

    #[test]
    fn furi_unrecommended_scheme_still_valid() {
        let outcome = evaluate(b"v=FORSALE1;furi=ftp://example.com/x");
        match outcome {
            RecordOutcome::ValidWithTag { tag, advisories } => {
                assert_eq!(tag.kind(), TagKind::Furi);
                assert_eq!(
                    advisories,
                    vec![Advisory::SchemeNotRecommended {
                        scheme: "ftp".into()
                    }]
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn empty_ftxt_is_length_violation() {
        match evaluate_text("v=FORSALE1;ftxt=") {
            RecordOutcome::MalformedTagValue(e) => {
                assert_eq!(e.kind, Some(TagKind::Ftxt));
                assert_eq!(e.violations, vec![Violation::Length { len: 0 }]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn two_distinct_tags_are_multiple_even_if_valid() {
        assert_eq!(
            evaluate_text("v=FORSALE1;fcod=A ftxt=B"),
            RecordOutcome::MalformedMultipleTags {
                kinds: vec![TagKind::Fcod, TagKind::Ftxt]
            }
        );
    }

    #[test]
    fn tag_not_at_start() {
        assert_eq!(
            evaluate_text("v=FORSALE1;note fcod=X"),
            RecordOutcome::MalformedTagValue(TagError::new(
                Some(TagKind::Fcod),
                vec![Violation::TagNotAtStart { offset: 5 }]
            ))
        );
    }

    #[test]
    fn content_without_tag() {
        assert_eq!(
            evaluate_text("v=FORSALE1; call me"),
            RecordOutcome::MalformedTagValue(TagError::new(
                None,
                vec![Violation::NoContentTag {
                    content: "call me".into()
                }]
            ))
        );
    }

    #[test]
    fn tag_keys_are_case_sensitive() {
        assert!(matches!(
            evaluate_text("v=FORSALE1;FCOD=X"),
            RecordOutcome::MalformedTagValue(TagError { kind: None, .. })
        ));
    }

    #[test]
    fn whitespace_between_version_and_tag_tolerated() {
        assert!(evaluate_text("v=FORSALE1; fcod=X ").is_valid());
    }

    #[test]
    fn undecodable_bytes() {
        assert!(matches!(
            evaluate(b"v=FORSALE1;ftxt=\xff"),
            RecordOutcome::DecodeFailed(_)
        ));
    }

    #[test]
    fn control_character_in_fcod_after_decode() {
        match evaluate(b"v=FORSALE1;fcod=A\x01B") {
            RecordOutcome::MalformedTagValue(e) => assert!(e.has_character_violation()),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
