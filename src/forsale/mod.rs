//! `_for-sale` TXT records per draft-davids-forsalereg.
//!
//! A record is the version tag `v=FORSALE1;` followed by at most one content
//! tag (`fcod=`, `ftxt=` or `furi=`).

pub mod types;
pub mod decode;
pub mod parser;
pub mod validate;
pub mod encode;
pub mod render;
pub mod nlfs;
pub mod discovery;

pub use types::{
    ActionKind, Advisory, DisplayCategory, RawRecord, RecordOutcome, TagError, TagKind,
    TagOccurrence, ValidatedTag, Violation,
};
pub use decode::{decode_record, DecodeError};
pub use parser::{evaluate, evaluate_content, evaluate_text, split_tags, strip_version, VERSION_TAG};
pub use validate::{
    is_recommended_scheme, validate_fcod, validate_ftxt, validate_furi, validate_tag, Validated,
    MAX_VALUE_LEN, RECOMMENDED_SCHEMES,
};
pub use encode::{encode, generate, zone_entry, Generated, MAX_RECORD_LEN};
pub use render::{action_for, render};
pub use nlfs::{nlfs_action, nlfs_identifier};
pub use discovery::{
    evaluate_records, DomainReport, ForSaleVerifier, LookupStatus, RecordReport, Summary,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForSaleError {
    #[error("DNS error: {0}")]
    Dns(#[from] crate::common::dns::DnsError),
    #[error("invalid domain: '{0}'")]
    InvalidDomain(String),
}
