//! Domain name helpers shared by DNS gateways

use crate::error::{CloudError, Result};

/// Derive the hosted zone name (`host.tld`) a domain belongs to.
///
/// `example.com`, `apple.example.com` and `blanket.apple.example.com` all
/// resolve to `example.com`.
pub fn hosted_zone_name(domain_name: &str) -> Result<String> {
    let labels: Vec<&str> = domain_name.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(CloudError::Validation(format!(
            "Invalid domainName to split.  Expected a value with *.{{host}}.{{tld}} and received {}",
            domain_name
        )));
    }
    Ok(labels[labels.len() - 2..].join("."))
}

/// Hosted zone names come back fully qualified (`example.com.`).
pub fn is_zone_for(zone_name: &str, hosted_zone: &str) -> bool {
    zone_name.trim_end_matches('.') == hosted_zone.trim_end_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosted_zone_name() {
        assert_eq!(hosted_zone_name("example.com").unwrap(), "example.com");
        assert_eq!(hosted_zone_name("apple.example.com").unwrap(), "example.com");
        assert_eq!(
            hosted_zone_name("blanket.apple.example.com").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_hosted_zone_name_without_tld() {
        let err = hosted_zone_name("example").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid domainName to split.  Expected a value with *.{host}.{tld} and received example"
        );
    }

    #[test]
    fn test_hosted_zone_name_rejects_empty_labels() {
        for domain in ["example.", ".com", "api..com", "."] {
            let err = hosted_zone_name(domain).unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().ends_with(&format!("received {domain}")));
        }
    }

    #[test]
    fn test_is_zone_for() {
        assert!(is_zone_for("example.net.", "example.net"));
        assert!(!is_zone_for("mars.example.net.", "example.net"));
    }
}
