//! Diagnostic sink for subtype checks.
//!
//! Subtype queries never fail; when a caller wants to know *why* a relation does not hold it passes a
//! [`SubtypeDiagnostics`] and reads the accumulated reasons afterwards.

use std::fmt;

/// Accumulates human-readable reasons explaining why a subtype relation does not hold.
///
/// Reasons are kept in the order they were encountered. By default the checker keeps going after the
/// first incompatible method so that every problem is reported; [`SubtypeDiagnostics::first_only`]
/// restores short-circuit behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtypeDiagnostics {
    reasons: Vec<String>,
    first_only: bool,
}

impl SubtypeDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that stops the check at the first failing requirement.
    pub fn first_only() -> Self {
        Self {
            reasons: Vec::new(),
            first_only: true,
        }
    }

    /// Whether checkers should continue after a failed requirement.
    pub fn keep_going(&self) -> bool {
        !self.first_only
    }

    pub fn push(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    pub fn into_reasons(self) -> Vec<String> {
        self.reasons
    }
}

impl fmt::Display for SubtypeDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for reason in &self.reasons {
            writeln!(f, "{}", reason)?;
        }
        Ok(())
    }
}
