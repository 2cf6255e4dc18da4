//! Structural TOML check.
//!
//! # Responsibilities
//! - Catch unclosed section headers (`[section` without `]`)
//! - Catch keys whose first dotted segment is not a bare key
//!   (`1bad = 1`, `.leading = 1`)
//!
//! The check is line-oriented; values, quoting, and table semantics are
//! left to the program that consumes the file. A file the real parser
//! would reject can pass here; a file this gate rejects is broken for
//! sure.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

static BARE_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

/// First dotted segment of a key: letter or underscore, then letters,
/// digits, `_`, `-`, `.`.
fn bare_key_regex() -> &'static Regex {
    BARE_KEY_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_\-.]*$").expect("bare key regex is valid")
    })
}

/// Outcome of a structural check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

/// Why a document was rejected, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectReason,
    /// 1-based line number of the offending line.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnclosedBracket,
    InvalidKeyFormat,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectReason::UnclosedBracket => {
                write!(f, "Line {}: Unclosed bracket in section header", self.line)
            }
            RejectReason::InvalidKeyFormat => {
                write!(f, "Line {}: Invalid key format", self.line)
            }
        }
    }
}

/// Check a document line by line, stopping at the first problem.
pub fn check_structure(content: &str) -> Verdict {
    for (index, raw_line) in content.split('\n').enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && !line.ends_with(']') {
            return Verdict::Rejected(Rejection {
                reason: RejectReason::UnclosedBracket,
                line: index + 1,
            });
        }

        if let Some((key, _)) = line.split_once('=') {
            if line.starts_with('[') {
                continue;
            }
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let first_segment = key.split('.').next().unwrap_or_default();
            if !bare_key_regex().is_match(first_segment) {
                return Verdict::Rejected(Rejection {
                    reason: RejectReason::InvalidKeyFormat,
                    line: index + 1,
                });
            }
        }
    }

    Verdict::Accepted
}
