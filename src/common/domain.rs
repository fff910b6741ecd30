/// Owner label under which for-sale records are published.
pub const FOR_SALE_LABEL: &str = "_for-sale";

/// Normalize a domain: trim, lowercase, strip trailing dot.
pub fn normalize(domain: &str) -> String {
    let d = domain.trim().to_ascii_lowercase();
    d.strip_suffix('.').unwrap_or(&d).to_string()
}

/// Check if `child` is a subdomain of `parent` (after normalization).
/// A domain is NOT a subdomain of itself.
pub fn is_subdomain_of(child: &str, parent: &str) -> bool {
    let nc = normalize(child);
    let np = normalize(parent);
    if nc == np {
        return false;
    }
    nc.ends_with(&format!(".{}", np))
}

/// Whether a domain is in the `.arpa` infrastructure hierarchy, where
/// for-sale records are out of scope.
pub fn is_arpa(domain: &str) -> bool {
    normalize(domain) == "arpa" || is_subdomain_of(domain, "arpa")
}

/// Query name for a domain's for-sale records, without trailing dot.
pub fn for_sale_name(domain: &str) -> String {
    format!("{}.{}", FOR_SALE_LABEL, normalize(domain))
}
