//! Built-in patterns.

use std::sync::OnceLock;

use regex::Regex;

const EMAIL_PATTERN: &str = concat!(
    r"^[0-9A-Za-z_!#$%&'*+/=?^`{|}~-]+(?:\.[0-9A-Za-z_!#$%&'*+/=?^`{|}~-]+)*",
    r"@(?:[0-9A-Za-z_](?:[0-9A-Za-z_-]*[0-9A-Za-z_])?\.)+",
    r"[a-zA-Z0-9](?:[0-9A-Za-z_-]*[0-9A-Za-z_])?$",
);

/// The pattern used by [`Validator::match_email`](crate::Validator::match_email).
///
/// Compiled once on first use and shared for the life of the process.
pub fn email() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid regex"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for addr in [
            "bob@example.com",
            "first.last@sub.example.co.uk",
            "x+tag@host-name.io",
            "o'brien@example.org",
            "a_b@c9.dev",
        ] {
            assert!(email().is_match(addr), "{addr}");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for addr in [
            "",
            "bob",
            "bob@",
            "@example.com",
            "bob@example",
            "bob@@example.com",
            ".bob@example.com",
            "bob.@example.com",
            "bob@-example.com",
            "bob @example.com",
            "bób@example.com",
        ] {
            assert!(!email().is_match(addr), "{addr}");
        }
    }

    #[test]
    fn test_same_instance() {
        assert!(std::ptr::eq(email(), email()));
    }
}
