use regex::Regex;
use std::sync::OnceLock;

// Dotted or quoted local part, then dot-separated labels with a final label
// of at least two characters.
const EMAIL_PATTERN: &str = r#"(?i)^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@(([^<>()\[\].,;:\s@"]+\.)+[^<>()\[\].,;:\s@"]{2,})$"#;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Syntax check applied at the boundary before an address reaches the
/// checker. The checker itself never re-validates.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user+spam-pattern@test.com"));
        assert!(is_valid_email("first.last@mail.example.co.uk"));
        assert!(is_valid_email("UPPER@EXAMPLE.ORG"));
        assert!(is_valid_email("\"odd local\"@example.com"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("user..dots@example.com"));
        assert!(!is_valid_email(".user@example.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(" user@example.com"));
        assert!(!is_valid_email("user@exa mple.com"));
    }
}
