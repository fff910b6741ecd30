use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{ResolveError, TokioResolver};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    #[error("no TXT records at this name")]
    NoRecords,
    #[error("NXDOMAIN: domain does not exist")]
    NxDomain,
    #[error("DNS transport error: {0}")]
    Transport(String),
}

/// Character-strings of one TXT RR, as raw bytes.
pub type TxtStrings = Vec<Vec<u8>>;

/// DNS resolver trait for abstracting TXT lookups.
///
/// Each returned entry is one TXT RR with all of its character-strings.
pub trait DnsResolver: Clone + Send + Sync + 'static {
    fn query_txt(&self, name: &str) -> impl Future<Output = Result<Vec<TxtStrings>, DnsError>> + Send;
}

/// Hickory DNS resolver implementation
#[derive(Clone)]
pub struct HickoryResolver {
    resolver: TokioResolver,
}

impl HickoryResolver {
    /// Resolver configured from `/etc/resolv.conf`, falling back to
    /// hickory's default upstream configuration when that cannot be read.
    pub fn new() -> Self {
        Self::from_system_conf().unwrap_or_else(|e| {
            warn!(error = %e, "system resolver configuration unavailable, using defaults");
            Self::with_config(ResolverConfig::default(), ResolverOpts::default())
        })
    }

    /// Resolver configured from the system's `/etc/resolv.conf`.
    pub fn from_system_conf() -> Result<Self, DnsError> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| DnsError::Transport(e.to_string()))?
            .build();
        Ok(Self { resolver })
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();
        Self { resolver }
    }

    /// Resolver sending queries to the given nameservers on port 53.
    pub fn with_nameservers(ips: &[IpAddr]) -> Self {
        let group = NameServerConfigGroup::from_ips_clear(ips, 53, true);
        let config = ResolverConfig::from_parts(None, vec![], group);
        Self::with_config(config, ResolverOpts::default())
    }

    fn classify_error(e: &ResolveError) -> DnsError {
        // NXDOMAIN is a NoRecordsFound with an NXDomain response code.
        if e.is_nx_domain() {
            DnsError::NxDomain
        } else if e.is_no_records_found() {
            DnsError::NoRecords
        } else {
            DnsError::Transport(e.to_string())
        }
    }
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsResolver for HickoryResolver {
    async fn query_txt(&self, name: &str) -> Result<Vec<TxtStrings>, DnsError> {
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<TxtStrings> = lookup
                    .iter()
                    .map(|txt| txt.txt_data().iter().map(|s| s.to_vec()).collect())
                    .collect();
                debug!(query = name, count = records.len(), "TXT lookup answered");
                Ok(records)
            }
            Err(e) => Err(Self::classify_error(&e)),
        }
    }
}

/// Mock DNS resolver for testing
#[derive(Clone, Default)]
pub struct MockResolver {
    txt_records: Arc<Mutex<HashMap<String, Vec<TxtStrings>>>>,
    nxdomain: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<HashMap<String, String>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add TXT RRs holding a single character-string each.
    pub fn add_txt(&self, name: &str, records: Vec<Vec<u8>>) {
        self.add_txt_parts(name, records.into_iter().map(|r| vec![r]).collect());
    }

    /// Add TXT RRs with explicit character-strings.
    pub fn add_txt_parts(&self, name: &str, records: Vec<TxtStrings>) {
        self.txt_records.lock().unwrap().insert(name.to_lowercase(), records);
    }

    /// Add text records, one character-string each.
    pub fn add_txt_str(&self, name: &str, records: &[&str]) {
        self.add_txt(name, records.iter().map(|r| r.as_bytes().to_vec()).collect());
    }

    pub fn set_nxdomain(&self, name: &str) {
        self.nxdomain.lock().unwrap().push(name.to_lowercase());
    }

    /// Make lookups of `name` fail with a transport error.
    pub fn set_failure(&self, name: &str, message: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert(name.to_lowercase(), message.to_string());
    }
}

impl DnsResolver for MockResolver {
    async fn query_txt(&self, name: &str) -> Result<Vec<TxtStrings>, DnsError> {
        let name_lower = name.to_lowercase();
        if let Some(message) = self.failing.lock().unwrap().get(&name_lower) {
            return Err(DnsError::Transport(message.clone()));
        }
        if self.nxdomain.lock().unwrap().contains(&name_lower) {
            return Err(DnsError::NxDomain);
        }
        match self.txt_records.lock().unwrap().get(&name_lower) {
            Some(records) if !records.is_empty() => Ok(records.clone()),
            _ => Err(DnsError::NoRecords),
        }
    }
}
