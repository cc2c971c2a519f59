//! Masking of secret values before text reaches a log line or the CI console.
//!
//! A `Redactor` is passed explicitly to whatever writes output (the workflow
//! console, the azcopy runner); there is no global secret registry.

use std::borrow::Cow;

/// Replacement shown in place of a secret.
pub const MASK: &str = "***";

#[derive(Debug, Clone, Default)]
pub struct Redactor {
    secrets: Vec<String>,
}

impl Redactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret. Empty strings are ignored since they would match everywhere.
    pub fn add_secret(&mut self, secret: impl Into<String>) {
        let secret = secret.into();
        if secret.is_empty() || self.secrets.contains(&secret) {
            return;
        }
        self.secrets.push(secret);
        // Longest first so a secret that contains another is masked whole.
        self.secrets.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.add_secret(secret);
        self
    }

    pub fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.secrets.iter().any(|s| text.contains(s.as_str())) {
            return Cow::Borrowed(text);
        }
        let mut out = text.to_string();
        for secret in &self.secrets {
            out = out.replace(secret.as_str(), MASK);
        }
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_every_occurrence() {
        let r = Redactor::new().with_secret("sv=2020&sig=abc");
        let line = "copy a https://x/?sv=2020&sig=abc then https://y/c?sv=2020&sig=abc";
        assert_eq!(
            r.redact(line),
            "copy a https://x/?*** then https://y/c?***"
        );
    }

    #[test]
    fn untouched_text_is_borrowed() {
        let r = Redactor::new().with_secret("token");
        assert!(matches!(r.redact("nothing here"), Cow::Borrowed(_)));
    }

    #[test]
    fn empty_secret_ignored() {
        let r = Redactor::new().with_secret("");
        assert_eq!(r.redact("abc"), "abc");
    }

    #[test]
    fn overlapping_secrets_mask_longest() {
        let r = Redactor::new().with_secret("sig").with_secret("sig=XYZ");
        assert_eq!(r.redact("q?sig=XYZ"), "q?***");
    }
}
