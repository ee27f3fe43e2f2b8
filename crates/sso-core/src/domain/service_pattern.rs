// ============================================================================
// SSO Core - Service Pattern
// File: crates/sso-core/src/domain/service_pattern.rs
// Description: Case-insensitive matcher compiled from a service id
// ============================================================================
//! Pattern language of `service_id`.
//!
//! * A pattern starting with `^` is a regular expression, anchored at both ends.
//! * Anything else is an Ant-style glob: `**` admits any characters, `*` admits
//!   any characters except `/`, `?` admits a single character. Every other
//!   character is literal, so a pattern without wildcards is exact equality.
//!
//! Both forms compare case-insensitively.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use sso_shared::constants::REGEX_PATTERN_PREFIX;

use crate::error::DomainError;

/// Compiled form of a `service_id`.
#[derive(Debug, Clone)]
pub enum ServicePattern {
    /// Empty service id, never matches.
    Empty,
    Compiled(Regex),
    /// Regex that failed to compile, never matches.
    Invalid { service_id: String, reason: String },
}

impl ServicePattern {
    /// Compiles a service id. Failures are kept as `Invalid` so that
    /// matching degrades to a non-match.
    pub fn new(service_id: &str) -> Self {
        if service_id.is_empty() {
            return ServicePattern::Empty;
        }
        match Self::compile(service_id) {
            Ok(regex) => ServicePattern::Compiled(regex),
            Err(e) => {
                warn!("Invalid service pattern {}: {}", service_id, e);
                ServicePattern::Invalid {
                    service_id: service_id.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Compiles a service id, reporting a malformed regex as an error.
    pub fn parse(service_id: &str) -> Result<Self, DomainError> {
        match Self::new(service_id) {
            ServicePattern::Invalid { service_id, reason } => {
                Err(DomainError::InvalidServicePattern { service_id, reason })
            }
            pattern => Ok(pattern),
        }
    }

    pub fn is_regex(service_id: &str) -> bool {
        service_id.starts_with(REGEX_PATTERN_PREFIX)
    }

    pub fn is_match(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        match self {
            ServicePattern::Compiled(regex) => regex.is_match(id),
            ServicePattern::Empty | ServicePattern::Invalid { .. } => false,
        }
    }

    fn compile(service_id: &str) -> Result<Regex, regex::Error> {
        if Self::is_regex(service_id) {
            let source = format!("^(?:{})$", &service_id[REGEX_PATTERN_PREFIX.len_utf8()..]);
            RegexBuilder::new(&source).case_insensitive(true).build()
        } else {
            // `**` and `?` admit any character, line breaks included
            RegexBuilder::new(&glob_to_regex(service_id))
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
        }
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            _ => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }
    out.push('$');
    out
}
