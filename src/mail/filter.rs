//! Contact form input checks

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Allow-by-default denylist of SQL-injection shapes
    static ref DENYLIST: Regex = Regex::new(
        r"(?ix)
        \bselect\s+(\*|\w+(\s*,\s*\w+)*)\s+from\b
        | \binsert\s+into\b
        | \bupdate\s+\w+\s+set\b
        | \bdelete\s+from\b
        | \bdrop\s+(table|database)\b
        | \bunion\s+(all\s+)?select\b
        | --
        | /\*
        | \*/
        | ;\s*(select|insert|update|delete|drop|union|alter|create|exec)\b
        | '\s*(or|and)\s+'?[^'=\s]*'?\s*=
        "
    )
    .expect("denylist pattern is valid");

    static ref EMAIL: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid");
}

/// Whether a value matches the denylist
pub fn is_denied(value: &str) -> bool {
    DENYLIST.is_match(value)
}

/// Basic `local@domain.tld` shape check
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Strip line breaks from values that end up in mail headers
pub fn strip_line_breaks(value: &str) -> String {
    value.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denies_sql() {
        assert!(is_denied("SELECT * FROM users; --"));
        assert!(is_denied("x'; DROP TABLE posts"));
        assert!(is_denied("1 UNION ALL SELECT password"));
        assert!(is_denied("' OR '1'='1"));
        assert!(is_denied("insert into t values (1)"));
        assert!(is_denied("update users set admin = 1"));
        assert!(is_denied("select name, email from users"));
        assert!(is_denied("/* comment */"));
    }

    #[test]
    fn test_allows_ordinary_text() {
        assert!(!is_denied("Hi, I'd like a quote for a new website."));
        assert!(!is_denied("Please select a plan from your price list"));
        assert!(!is_denied("Could you update me on the set of options?"));
        assert!(!is_denied("Jean-Luc Picard"));
        assert!(!is_denied("jean-luc@example.com"));
        assert!(!is_denied("Budget: 5k; timeline: Q3"));
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.d"));
        assert!(!is_email(""));
    }

    #[test]
    fn test_strip_line_breaks() {
        assert_eq!(strip_line_breaks("a\r\nBcc: x@y.z"), "aBcc: x@y.z");
    }
}
