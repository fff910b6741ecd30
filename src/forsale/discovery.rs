use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::common::dns::{DnsError, DnsResolver};
use crate::common::domain::{for_sale_name, is_arpa, normalize};

use super::decode::decode_record;
use super::nlfs::nlfs_identifier;
use super::parser::evaluate_text;
use super::render::render;
use super::types::{DisplayCategory, RawRecord, RecordOutcome};
use super::ForSaleError;

/// How the lookup for a domain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// TXT records were returned and evaluated.
    Found,
    /// The name exists but holds no TXT records.
    NoRecords,
    /// The name does not exist.
    NxDomain,
    /// `.arpa` domains are not evaluated.
    OutOfScope,
}

/// Evaluation of one TXT record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    #[serde(skip)]
    pub raw: RawRecord,
    /// Decoded text, `None` when the record could not be decoded.
    pub text: Option<String>,
    /// Character-strings the RR held. Anything but 1 is non-conformant;
    /// the strings are evaluated joined.
    pub parts: usize,
    pub outcome: RecordOutcome,
    pub category: DisplayCategory,
}

/// Record counts by verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    /// Records without the version tag.
    pub ignored: usize,
    /// Malformed or undecodable records.
    pub invalid: usize,
}

/// Result of checking one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    pub domain: String,
    pub query: String,
    pub status: LookupStatus,
    pub records: Vec<RecordReport>,
}

impl DomainReport {
    /// Whether any record declares the domain for sale.
    pub fn is_for_sale(&self) -> bool {
        self.records.iter().any(|r| r.category.is_for_sale())
    }

    /// Records not published as a single character-string.
    pub fn multi_part_records(&self) -> impl Iterator<Item = &RecordReport> {
        self.records.iter().filter(|r| r.parts != 1)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.records.len(),
            ..Summary::default()
        };
        for record in &self.records {
            if record.outcome.is_valid() {
                summary.valid += 1;
            } else if record.outcome.is_invalid() {
                summary.invalid += 1;
            } else {
                summary.ignored += 1;
            }
        }
        summary
    }
}

/// Evaluate a set of raw records independently.
///
/// Decoded records are ordered by their text; undecodable records follow
/// in arrival order.
pub fn evaluate_records(records: Vec<RawRecord>) -> Vec<RecordReport> {
    let mut decoded = Vec::new();
    let mut failed = Vec::new();

    for raw in records {
        if !raw.is_single_string() {
            warn!(
                parts = raw.parts(),
                "TXT record is not a single character-string; evaluating the strings joined"
            );
        }
        match decode_record(raw.as_bytes()) {
            Ok(text) => decoded.push((text, raw)),
            Err(e) => {
                debug!(error = %e, "skipping undecodable TXT record");
                let outcome = RecordOutcome::DecodeFailed(e);
                failed.push(RecordReport {
                    parts: raw.parts(),
                    raw,
                    text: None,
                    category: render(&outcome),
                    outcome,
                });
            }
        }
    }

    decoded.sort_by(|a, b| a.0.cmp(&b.0));

    let mut reports: Vec<RecordReport> = decoded
        .into_iter()
        .map(|(text, raw)| {
            let outcome = evaluate_text(&text);
            trace!(record = %text, ?outcome, "evaluated TXT record");
            RecordReport {
                parts: raw.parts(),
                raw,
                category: render(&outcome),
                text: Some(text),
                outcome,
            }
        })
        .collect();
    reports.append(&mut failed);
    reports
}

/// For-sale record discovery for a domain.
pub struct ForSaleVerifier<R: DnsResolver> {
    resolver: R,
    nlfs_only: bool,
}

impl<R: DnsResolver> ForSaleVerifier<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            nlfs_only: false,
        }
    }

    /// Keep only records carrying an NLFS fcod.
    pub fn nlfs_only(mut self, enabled: bool) -> Self {
        self.nlfs_only = enabled;
        self
    }

    /// Look up and evaluate `_for-sale.<domain>`.
    ///
    /// A missing name or empty answer is a report with no records, not an
    /// error. Transport failures are returned as `ForSaleError::Dns`.
    pub async fn check(&self, domain: &str) -> Result<DomainReport, ForSaleError> {
        let normalized = normalize(domain);
        if normalized.is_empty() {
            return Err(ForSaleError::InvalidDomain(domain.to_string()));
        }
        let query = for_sale_name(&normalized);

        if is_arpa(&normalized) {
            debug!(domain = %normalized, "skipping .arpa domain");
            return Ok(self.empty_report(normalized, query, LookupStatus::OutOfScope));
        }

        debug!(%query, "looking up for-sale records");
        let raw = match self.resolver.query_txt(&query).await {
            Ok(records) => records,
            Err(DnsError::NoRecords) => {
                return Ok(self.empty_report(normalized, query, LookupStatus::NoRecords));
            }
            Err(DnsError::NxDomain) => {
                return Ok(self.empty_report(normalized, query, LookupStatus::NxDomain));
            }
            Err(e) => {
                warn!(%query, error = %e, "for-sale lookup failed");
                return Err(e.into());
            }
        };

        let mut records = evaluate_records(raw.into_iter().map(RawRecord::from_parts).collect());
        if self.nlfs_only {
            records.retain(|r| r.outcome.tag().and_then(nlfs_identifier).is_some());
        }

        Ok(DomainReport {
            domain: normalized,
            query,
            status: LookupStatus::Found,
            records,
        })
    }

    fn empty_report(&self, domain: String, query: String, status: LookupStatus) -> DomainReport {
        DomainReport {
            domain,
            query,
            status,
            records: Vec::new(),
        }
    }
}
