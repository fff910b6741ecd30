//! Parse, validate, generate and display `_for-sale` DNS TXT records.
//!
//! DNS resolution sits behind the `DnsResolver` trait; record evaluation
//! itself is pure and synchronous.

pub mod common;
pub mod forsale;

pub use common::dns::{DnsError, DnsResolver, HickoryResolver, MockResolver};
pub use forsale::{
    encode, evaluate, generate, render, zone_entry, DisplayCategory, DomainReport, ForSaleError,
    ForSaleVerifier, RecordOutcome, TagKind, ValidatedTag,
};
