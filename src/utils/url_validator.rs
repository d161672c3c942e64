//! URL-shape validation for shorty targets.
//!
//! A target URL must use the `http`, `https` or `ftp` scheme and point at a
//! public host: a hostname with a dot-separated TLD, or an IPv4 literal
//! outside the private, loopback and link-local ranges. Port, path, query and
//! fragment are optional and preserved as submitted.

use std::net::Ipv4Addr;
use url::{Host, Url};

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only http, https and ftp URLs are allowed")]
    UnsupportedScheme,

    #[error("URL host must be a public hostname or IPv4 address")]
    ForbiddenHost,
}

/// Validates a candidate target URL, returning the sanitized (trimmed) form
/// that should be persisted.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for blank input
/// - [`UrlValidationError::InvalidFormat`] for anything `url::Url` rejects
/// - [`UrlValidationError::UnsupportedScheme`] for schemes other than
///   http/https/ftp
/// - [`UrlValidationError::ForbiddenHost`] for private/loopback/link-local
///   IPv4 hosts, bare hostnames without a TLD, and IPv6 literals
pub fn validate_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let parsed =
        Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" | "ftp" => {}
        _ => return Err(UrlValidationError::UnsupportedScheme),
    }

    match parsed.host() {
        Some(Host::Ipv4(addr)) if is_public_ipv4(addr) => {}
        Some(Host::Domain(domain)) if is_qualified_hostname(domain) => {}
        _ => return Err(UrlValidationError::ForbiddenHost),
    }

    Ok(trimmed.to_string())
}

/// Rejects addresses a short link should never point at: loopback, RFC 1918
/// private ranges, link-local, 0.0.0.0/8 and multicast/reserved space.
fn is_public_ipv4(addr: Ipv4Addr) -> bool {
    let first_octet = addr.octets()[0];

    !(addr.is_loopback()
        || addr.is_private()
        || addr.is_link_local()
        || first_octet == 0
        || first_octet > 223)
}

/// A hostname qualifies when every label is alphanumeric-with-inner-hyphens
/// and the final label looks like a TLD (at least two letters, or punycode).
/// Bare names such as `localhost` do not qualify.
fn is_qualified_hostname(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let valid_label = |label: &&str| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !labels.iter().all(valid_label) {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.starts_with("xn--") || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}
