//! Common error infrastructure for rules-core.
//!
//! Domain-specific errors (e.g. `ConsumeError`, `ScalingError`) are defined in
//! their respective modules alongside the logic they validate. This module
//! provides the shared severity classification and the trait every error type
//! implements.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each resolver has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **No Swallowing**: Fatal errors indicate malformed item data and must
//!   propagate to the caller unchanged

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// Recoverable error - the action aborts cleanly and may be retried.
    ///
    /// Examples: insufficient ammunition, no charges remaining
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: consume target reference cannot be resolved
    Validation,

    /// Fatal error - malformed item or actor configuration.
    ///
    /// Examples: capability query on the wrong item kind, flat save DC
    /// declared without a value
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all rules-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impls
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable identifiers used for categorization and testing
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}
