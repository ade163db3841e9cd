//! Email address validation
//!
//! Syntax check only: no DNS lookup, no normalization. The pattern and the
//! length limits are applied in a fixed order and must stay that way, since
//! existing records were accepted by exactly these rules.

use std::sync::LazyLock;

use regex::Regex;

/// Whole address, including the RFC 5321 overall limit
const MAX_EMAIL_LEN: usize = 254;
/// Part before `@`
const MAX_LOCAL_PART_LEN: usize = 64;
/// Each `.`-separated label of the domain
const MAX_DOMAIN_LABEL_LEN: usize = 63;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[-!#$%&'*+/0-9=?A-Z^_a-z{|}~](\.?[-!#$%&'*+/0-9=?A-Z^_a-z`{|}~])*@[a-zA-Z0-9](-*\.?[a-zA-Z0-9])*\.[a-zA-Z](-?[a-zA-Z0-9])+$",
    )
    .expect("email pattern is a valid regex")
});

pub fn is_email_valid(email: &str) -> bool {
    if email.is_empty() {
        return false;
    }

    if email.len() > MAX_EMAIL_LEN {
        return false;
    }

    if !EMAIL_RE.is_match(email) {
        return false;
    }

    // The pattern guarantees exactly one '@'
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.len() > MAX_LOCAL_PART_LEN {
        return false;
    }

    !domain.split('.').any(|label| label.len() > MAX_DOMAIN_LABEL_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for email in [
            "jane@example.com",
            "jane.doe@example.com",
            "j+tag@mail.example.org",
            "first.last@sub-domain.example.co",
            "o'hara@example.ie",
            "x@a.io",
            "a.`b@example.com",
        ] {
            assert!(is_email_valid(email), "expected valid: {email}");
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(!is_email_valid(""));
    }

    #[test]
    fn test_rejects_malformed() {
        for email in [
            "plainaddress",
            "@example.com",
            "jane@",
            "jane@example",
            "jane@@example.com",
            "jane..doe@example.com",
            ".jane@example.com",
            "`jane@example.com",
            "jane@example.c",
            "jane@-example.com",
            "jane doe@example.com",
            "jane@example.com ",
            "jane@example.1com",
        ] {
            assert!(!is_email_valid(email), "expected invalid: {email}");
        }
    }

    #[test]
    fn test_local_part_limit() {
        let at_limit = format!("{}@example.com", "a".repeat(64));
        let over_limit = format!("{}@example.com", "a".repeat(65));
        assert!(is_email_valid(&at_limit));
        assert!(!is_email_valid(&over_limit));
    }

    #[test]
    fn test_domain_label_limit() {
        let at_limit = format!("jane@{}.com", "b".repeat(63));
        let over_limit = format!("jane@{}.com", "b".repeat(64));
        assert!(is_email_valid(&at_limit));
        assert!(!is_email_valid(&over_limit));
    }

    #[test]
    fn test_total_length_limit() {
        // 64 + 1 + 63 + 1 + 63 + 1 + 61 = 254
        let domain = format!("{}.{}.{}", "c".repeat(63), "d".repeat(63), "e".repeat(61));
        let at_limit = format!("{}@{}", "a".repeat(64), domain);
        assert_eq!(at_limit.len(), 254);
        assert!(is_email_valid(&at_limit));

        let over_limit = format!("{}@{}e", "a".repeat(64), domain);
        assert_eq!(over_limit.len(), 255);
        assert!(!is_email_valid(&over_limit));
    }
}
