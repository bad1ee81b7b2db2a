//! Log Redaction Layer
//!
//! Scrubs phone numbers and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[-.\s]?)?\(?\d{2,4}\)?[-.\s]\d{2,4}[-.\s]\d{3,4}|\b0\d{9,10}\b")
        .expect("telephone pattern is valid")
});
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").expect("token pattern is valid")
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = TELEPHONE_RE.replace_all(input, "[REDACTED_PHONE]");
    TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "Sending to +1-555-123-4567 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn japanese_numbers_are_redacted() {
        assert_eq!(
            redact_sensitive_data("ホテルに 03-1234-5678 で電話"),
            "ホテルに [REDACTED_PHONE] で電話"
        );
        assert_eq!(
            redact_sensitive_data("携帯 09012345678 です"),
            "携帯 [REDACTED_PHONE] です"
        );
    }

    #[test]
    fn plain_queries_pass_through() {
        assert_eq!(redact_sensitive_data("渋谷 ホテル 8000円"), "渋谷 ホテル 8000円");
    }
}
