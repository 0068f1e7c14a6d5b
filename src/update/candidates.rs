//! Replacement target candidates for a version

use std::fmt;

/// Flavour of a replacement target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Exactly the version (`2.0.0`)
    Strict,
    /// Caret range (`^2.0.0`)
    Caret,
    /// Tilde range (`~2.0.0`)
    Tilde,
    /// Version behind a forced prefix character
    Forced,
}

impl CandidateKind {
    /// Human-readable description, if the kind carries one
    pub fn description(&self) -> Option<&'static str> {
        match self {
            CandidateKind::Strict => Some("only strict version"),
            CandidateKind::Caret => Some("any minor update"),
            CandidateKind::Tilde => Some("any patch update"),
            CandidateKind::Forced => None,
        }
    }
}

/// A replacement target offered for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Flavour of the target
    pub kind: CandidateKind,
    /// Literal target string
    pub value: String,
}

impl Candidate {
    fn new(kind: CandidateKind, value: String) -> Self {
        Self { kind, value }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.description() {
            Some(description) => write!(f, "{} - {}", self.value, description),
            None => f.write_str(&self.value),
        }
    }
}

/// Builds the candidates for a version.
///
/// A forced prefix yields a single candidate; otherwise strict, caret and
/// tilde targets are offered in that order.
pub fn version_choices(version: &str, range_char: &str) -> Vec<Candidate> {
    if !range_char.is_empty() {
        return vec![Candidate::new(
            CandidateKind::Forced,
            format!("{}{}", range_char, version),
        )];
    }

    vec![
        Candidate::new(CandidateKind::Strict, version.to_string()),
        Candidate::new(CandidateKind::Caret, format!("^{}", version)),
        Candidate::new(CandidateKind::Tilde, format!("~{}", version)),
    ]
}
