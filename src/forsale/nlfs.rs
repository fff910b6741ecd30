//! NLFS for-sale codes: fcod values of the form `NLFS-` followed by a
//! 48-character identifier.

use super::types::ValidatedTag;

pub const NLFS_PREFIX: &str = "NLFS-";
pub const NLFS_ID_LEN: usize = 48;

/// Identifier the registry publishes as its worked example.
pub const KNOWN_IDENTIFIER: &str = "NGYyYjEyZWYtZTUzYi00M2U0LTliNmYtNTcxZjBhMzA2NWQy";

const LANDING_PAGE: &str = "https://www.sidn.nl/en/landing-page-buying-and-selling-example";

/// The 48-character identifier of an NLFS fcod, if `tag` is one.
pub fn nlfs_identifier(tag: &ValidatedTag) -> Option<&str> {
    match tag {
        ValidatedTag::Fcod { value } => value
            .strip_prefix(NLFS_PREFIX)
            .filter(|id| id.chars().count() == NLFS_ID_LEN),
        _ => None,
    }
}

/// Landing page for `identifier`, or `None` if the registry does not know it.
pub fn nlfs_action(identifier: &str, domain: &str) -> Option<String> {
    (identifier == KNOWN_IDENTIFIER).then(|| format!("{}?domain={}", LANDING_PAGE, domain))
}
