use super::types::{ActionKind, DisplayCategory, RecordOutcome, ValidatedTag};

/// Pick the display category for a record outcome.
///
/// A malformed content tag is treated as absent: the version tag alone
/// still declares the domain for sale.
pub fn render(outcome: &RecordOutcome) -> DisplayCategory {
    match outcome {
        RecordOutcome::NotRecognized | RecordOutcome::DecodeFailed(_) => {
            DisplayCategory::NotForSale
        }
        RecordOutcome::ValidNoContent
        | RecordOutcome::MalformedMultipleTags { .. }
        | RecordOutcome::MalformedTagValue(_) => DisplayCategory::ForSaleNoDetail,
        RecordOutcome::ValidWithTag { tag, .. } => render_tag(tag),
    }
}

fn render_tag(tag: &ValidatedTag) -> DisplayCategory {
    match tag {
        ValidatedTag::Fcod { value } => DisplayCategory::ForSaleWithCode {
            code: value.clone(),
        },
        ValidatedTag::Ftxt { value } => DisplayCategory::ForSaleWithText {
            text: value.clone(),
        },
        ValidatedTag::Furi { uri, scheme } => {
            let (kind, target) = action_for(uri, scheme);
            DisplayCategory::ForSaleAction {
                kind,
                target: target.to_string(),
            }
        }
    }
}

/// Action kind and target for a furi.
///
/// Web and unknown URIs target the whole URI; mailto and tel target the
/// address or number after `scheme:`.
pub fn action_for<'a>(uri: &'a str, scheme: &str) -> (ActionKind, &'a str) {
    let after_scheme = uri.get(scheme.len() + 1..).unwrap_or("");
    match scheme.to_ascii_lowercase().as_str() {
        "http" | "https" => (ActionKind::Visit, uri),
        "mailto" => (ActionKind::Email, after_scheme),
        "tel" => (ActionKind::Call, after_scheme),
        _ => (ActionKind::GenericUri, uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forsale::decode::DecodeError;
    use crate::forsale::parser::evaluate_text;
    use crate::forsale::types::{TagError, TagKind, Violation};

    #[test]
    fn not_recognized_is_not_for_sale() {
        assert_eq!(render(&RecordOutcome::NotRecognized), DisplayCategory::NotForSale);
        assert_eq!(
            render(&RecordOutcome::DecodeFailed(DecodeError::NonAscii {
                position: 0,
                byte: 0x80
            })),
            DisplayCategory::NotForSale
        );
    }

    #[test]
    fn malformed_is_for_sale_without_detail() {
        assert_eq!(
            render(&RecordOutcome::MalformedMultipleTags {
                kinds: vec![TagKind::Fcod, TagKind::Ftxt]
            }),
            DisplayCategory::ForSaleNoDetail
        );
        assert_eq!(
            render(&RecordOutcome::MalformedTagValue(TagError::new(
                Some(TagKind::Ftxt),
                vec![Violation::Length { len: 0 }]
            ))),
            DisplayCategory::ForSaleNoDetail
        );
        assert_eq!(
            render(&evaluate_text("v=FORSALE1;ftxt=")),
            DisplayCategory::ForSaleNoDetail
        );
    }

    #[test]
    fn version_only() {
        assert_eq!(
            render(&RecordOutcome::ValidNoContent),
            DisplayCategory::ForSaleNoDetail
        );
    }

    #[test]
    fn fcod_and_ftxt() {
        assert_eq!(
            render(&evaluate_text("v=FORSALE1;fcod=SALE-123")),
            DisplayCategory::ForSaleWithCode {
                code: "SALE-123".into()
            }
        );
        assert_eq!(
            render(&evaluate_text("v=FORSALE1;ftxt=Best offer")),
            DisplayCategory::ForSaleWithText {
                text: "Best offer".into()
            }
        );
    }

    #[test]
    fn furi_actions() {
        assert_eq!(
            render(&evaluate_text("v=FORSALE1;furi=mailto:sales@example.com")),
            DisplayCategory::ForSaleAction {
                kind: ActionKind::Email,
                target: "sales@example.com".into()
            }
        );
        assert_eq!(
            render(&evaluate_text("v=FORSALE1;furi=tel:+31701234567")),
            DisplayCategory::ForSaleAction {
                kind: ActionKind::Call,
                target: "+31701234567".into()
            }
        );
        assert_eq!(
            render(&evaluate_text("v=FORSALE1;furi=https://example.com/buy")),
            DisplayCategory::ForSaleAction {
                kind: ActionKind::Visit,
                target: "https://example.com/buy".into()
            }
        );
        assert_eq!(
            render(&evaluate_text("v=FORSALE1;furi=ftp://example.com/x")),
            DisplayCategory::ForSaleAction {
                kind: ActionKind::GenericUri,
                target: "ftp://example.com/x".into()
            }
        );
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        let (kind, target) = action_for("MAILTO:a@b.example", "MAILTO");
        assert_eq!(kind, ActionKind::Email);
        assert_eq!(target, "a@b.example");
    }
}
