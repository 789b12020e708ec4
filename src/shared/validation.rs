use lazy_static::lazy_static;
use regex::Regex;
use url::{Host, Url};
use validator::ValidationErrors;

lazy_static! {
    /// Regex for validating listing slugs
    /// Must be lowercase alphanumeric with single hyphens between runs
    /// - Valid: "acme-ai", "gpt4", "acme-ai-2"
    /// - Invalid: "-acme", "acme-", "acme--ai", "Acme", "acme_ai"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Runs of characters that cannot appear in a slug
    pub static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Accept only absolute http(s) URLs with a well-formed host
pub fn is_http_url(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }

    let Ok(url) = Url::parse(value) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => is_dns_name(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

/// Dot-separated labels of letters, digits and inner hyphens
fn is_dns_name(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Flatten validator output into user-facing messages, ordered by field name
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect()
}
