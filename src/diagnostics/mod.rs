//! Diagnostics reported while building a mapping plan.
//!
//! Nothing in the planner aborts on a per-contract or per-property problem.
//! Each problem degrades to a documented fallback and is reported here as a
//! [`Diagnostic`] instead.
//!
//! # Codes
//!
//! Codes are assigned by category:
//! - `PP-ENT-*`: managed entity inference
//! - `PP-ID-*`: identifier inference and generation strategy
//! - `PP-TYPE-*`: property type mappability
//! - `PP-REL-*`: relationship policy
//! - `PP-CFG-*`: configuration values
//! - `PP-QRY-*`: derived query methods

mod sink;

pub use sink::{count_by_severity, CollectingSink, DiagnosticSink, SeverityCounts, TracingSink};

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Structured diagnostic code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DiagnosticCode(&'static str);

impl DiagnosticCode {
    /// Managed entity type could not be determined
    pub const ENTITY_INFERENCE_FAILED: DiagnosticCode = DiagnosticCode("PP-ENT-001");

    /// Identifier type could not be inferred from the contract
    pub const ID_INFERENCE_FAILED: DiagnosticCode = DiagnosticCode("PP-ID-001");
    /// Generation strategy cannot work with the identifier type
    pub const ID_STRATEGY_INCOMPATIBLE: DiagnosticCode = DiagnosticCode("PP-ID-002");
    /// Generation strategy is unusual for the identifier type
    pub const ID_STRATEGY_MISMATCH: DiagnosticCode = DiagnosticCode("PP-ID-003");

    /// Type needs an explicit converter
    pub const TYPE_NEEDS_CONVERTER: DiagnosticCode = DiagnosticCode("PP-TYPE-001");
    /// Type is not directly mappable
    pub const TYPE_UNMAPPABLE: DiagnosticCode = DiagnosticCode("PP-TYPE-002");

    /// Orphan removal across an aggregate boundary
    pub const REL_ORPHAN_REMOVAL_ACROSS_AGGREGATES: DiagnosticCode = DiagnosticCode("PP-REL-001");
    /// Destructive cascade across an aggregate boundary
    pub const REL_DESTRUCTIVE_CASCADE: DiagnosticCode = DiagnosticCode("PP-REL-002");
    /// Many-to-one reference across an aggregate boundary
    pub const REL_MANY_TO_ONE_ACROSS_AGGREGATES: DiagnosticCode = DiagnosticCode("PP-REL-003");
    /// Same target referenced by several relationships
    pub const REL_SHARED_TARGET: DiagnosticCode = DiagnosticCode("PP-REL-004");

    /// Configuration value has the wrong type or an unknown value
    pub const CONFIG_INVALID_VALUE: DiagnosticCode = DiagnosticCode("PP-CFG-001");

    /// Query criteria and parameters do not line up
    pub const QUERY_PARAMETER_MISMATCH: DiagnosticCode = DiagnosticCode("PP-QRY-001");
    /// Query criterion names a property the entity does not declare
    pub const QUERY_UNKNOWN_PROPERTY: DiagnosticCode = DiagnosticCode("PP-QRY-002");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reported problem, with the context it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Where the problem was found, e.g. `Order.email` or `OrderRepository`.
    pub plugin_context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            plugin_context: String::new(),
            cause: None,
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    #[must_use]
    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        self.plugin_context = context.into();
        self
    }

    #[must_use]
    pub fn caused_by(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.severity, self.code)?;
        if !self.plugin_context.is_empty() {
            write!(f, " {}", self.plugin_context)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {cause})")?;
        }
        Ok(())
    }
}
