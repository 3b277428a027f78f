//! Structured Error Handling for fuzzy-paradise
//!
//! Provides a unified error type with:
//! - Error codes for programmatic handling
//! - Structured error output (JSON-friendly)
//! - Context preservation through error chains
//!
//! # Error Categories
//!
//! - Configuration (1xxx) - the model is malformed; raised while building an engine
//! - Evaluation (2xxx) - a single evaluation could not produce a crisp output
//! - Config file (7xxx) - loading `fuzzy-paradise.toml` failed
//! - Internal (9xxx)
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_paradise::error::{FuzzyError, ErrorCode};
//!
//! fn check(name: &str) -> Result<(), FuzzyError> {
//!     if name.is_empty() {
//!         return Err(FuzzyError::configuration("variable name cannot be empty")
//!             .with_context("variable", name));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Configuration errors (1xxx)
    /// Generic model configuration error
    ConfigurationError = 1000,
    /// Two variables share a name
    DuplicateVariable = 1001,
    /// Two terms of one variable share a name
    DuplicateTerm = 1002,
    /// Membership breakpoints are not non-decreasing or not finite
    InvalidBreakpoints = 1003,
    /// Universe bounds or step are unusable
    InvalidUniverse = 1004,
    /// A rule references a variable that was never declared
    UndeclaredVariable = 1005,
    /// A rule references a term its variable does not define
    UndeclaredTerm = 1006,
    /// A rule uses a consequent in its antecedent or vice versa
    RoleMismatch = 1007,
    /// A rule has no consequent assignment
    EmptyConsequent = 1008,
    /// Rule text could not be parsed
    RuleSyntax = 1009,

    // Evaluation errors (2xxx)
    /// Generic evaluation error
    EvaluationError = 2000,
    /// No value supplied for a declared input variable
    MissingInput = 2001,
    /// An input value is NaN or infinite
    NonFiniteInput = 2002,
    /// Aggregated output curve has zero total membership
    DegenerateAggregation = 2003,
    /// Requested output variable does not exist
    UnknownOutput = 2004,

    // Config errors (7xxx)
    /// Generic config error
    ConfigError = 7000,
    /// Config file not found
    ConfigNotFound = 7001,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,
    /// Invalid config value
    InvalidConfigValue = 7003,

    // Internal errors (9xxx)
    /// Internal error
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationError => "Configuration error",
            ErrorCode::DuplicateVariable => "Duplicate variable",
            ErrorCode::DuplicateTerm => "Duplicate term",
            ErrorCode::InvalidBreakpoints => "Invalid membership breakpoints",
            ErrorCode::InvalidUniverse => "Invalid universe",
            ErrorCode::UndeclaredVariable => "Undeclared variable",
            ErrorCode::UndeclaredTerm => "Undeclared term",
            ErrorCode::RoleMismatch => "Variable used in the wrong role",
            ErrorCode::EmptyConsequent => "Rule has no consequent",
            ErrorCode::RuleSyntax => "Invalid rule syntax",

            ErrorCode::EvaluationError => "Evaluation error",
            ErrorCode::MissingInput => "Missing input",
            ErrorCode::NonFiniteInput => "Non-finite input",
            ErrorCode::DegenerateAggregation => "Degenerate aggregation",
            ErrorCode::UnknownOutput => "Unknown output variable",

            ErrorCode::ConfigError => "Config file error",
            ErrorCode::ConfigNotFound => "Config file not found",
            ErrorCode::InvalidConfigSyntax => "Invalid config syntax",
            ErrorCode::InvalidConfigValue => "Invalid config value",

            ErrorCode::InternalError => "Internal error",
        }
    }

    /// True for every code raised while building a model
    pub fn is_configuration(&self) -> bool {
        (1000..2000).contains(&self.code())
    }

    /// True for every code raised by a single evaluation
    pub fn is_evaluation(&self) -> bool {
        (2000..3000).contains(&self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, String>,
    /// Source location (file:line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Stack of error causes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the context
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for fuzzy-paradise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FuzzyError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    // ========================================================================
    // Factory methods
    // ========================================================================

    /// Create a generic configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    pub fn duplicate_variable(name: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateVariable,
            format!("variable '{}' is declared more than once", name),
        )
        .with_context("variable", name)
    }

    pub fn duplicate_term(variable: &str, term: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateTerm,
            format!("term '{}' is declared more than once on '{}'", term, variable),
        )
        .with_context("variable", variable)
        .with_context("term", term)
    }

    /// Create a malformed breakpoint error
    pub fn invalid_breakpoints(points: &[f64]) -> Self {
        Self::new(
            ErrorCode::InvalidBreakpoints,
            format!("breakpoints {:?} must be finite and non-decreasing", points),
        )
    }

    pub fn invalid_universe(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidUniverse, message)
    }

    pub fn undeclared_variable(name: &str) -> Self {
        Self::new(
            ErrorCode::UndeclaredVariable,
            format!("rule references undeclared variable '{}'", name),
        )
        .with_context("variable", name)
    }

    pub fn undeclared_term(variable: &str, term: &str) -> Self {
        Self::new(
            ErrorCode::UndeclaredTerm,
            format!("variable '{}' has no term '{}'", variable, term),
        )
        .with_context("variable", variable)
        .with_context("term", term)
    }

    /// Create a rule syntax error
    pub fn rule_syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RuleSyntax, message)
    }

    /// Create a missing input error
    pub fn missing_input(variable: &str) -> Self {
        Self::new(
            ErrorCode::MissingInput,
            format!("no value supplied for input variable '{}'", variable),
        )
        .with_context("variable", variable)
    }

    pub fn non_finite_input(variable: &str, value: f64) -> Self {
        Self::new(
            ErrorCode::NonFiniteInput,
            format!("input '{}' is not a finite number ({})", variable, value),
        )
        .with_context("variable", variable)
    }

    /// Create a degenerate aggregation error
    pub fn degenerate(variable: &str) -> Self {
        Self::new(
            ErrorCode::DegenerateAggregation,
            format!("aggregated curve of '{}' has zero total membership", variable),
        )
        .with_context("variable", variable)
        .with_hint("no rule fired for these inputs; the rule base may have a coverage gap")
    }

    pub fn unknown_output(variable: &str) -> Self {
        Self::new(
            ErrorCode::UnknownOutput,
            format!("'{}' is not an output variable", variable),
        )
        .with_context("variable", variable)
    }

    /// Create a config file error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add a cause to the error chain
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.causes.push(cause.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Model-building error (never produced by `evaluate`)
    pub fn is_configuration(&self) -> bool {
        self.code.is_configuration()
    }

    pub fn is_evaluation(&self) -> bool {
        self.code.is_evaluation()
    }

    /// Look up a context field
    pub fn context_field(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|c| c.fields.get(key))
            .map(String::as_str)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL_ERROR","message":"{}"}}"#, self.message)
        })
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl fmt::Display for FuzzyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if !ctx.fields.is_empty() {
                let mut fields: Vec<_> = ctx.fields.iter().collect();
                fields.sort();
                let fields: Vec<String> = fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                write!(f, " ({})", fields.join(", "))?;
            }
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
            if !ctx.causes.is_empty() {
                write!(f, "\nCaused by:")?;
                for cause in &ctx.causes {
                    write!(f, "\n  - {}", cause)?;
                }
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for FuzzyError {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<std::io::Error> for FuzzyError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::ConfigNotFound,
            _ => ErrorCode::ConfigError,
        };
        FuzzyError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for FuzzyError {
    fn from(err: serde_json::Error) -> Self {
        FuzzyError::config(err.to_string())
            .with_code(ErrorCode::InvalidConfigSyntax)
            .with_context("format", "JSON")
    }
}

impl From<toml::de::Error> for FuzzyError {
    fn from(err: toml::de::Error) -> Self {
        FuzzyError::config(err.to_string())
            .with_code(ErrorCode::InvalidConfigSyntax)
            .with_context("format", "TOML")
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// A Result type using FuzzyError
pub type FuzzyResult<T> = Result<T, FuzzyError>;

// ============================================================================
// Macros for convenient error creation
// ============================================================================

/// Create a FuzzyError with context from the current location
#[macro_export]
macro_rules! fuzzy_error {
    ($code:expr, $msg:expr) => {
        $crate::error::FuzzyError::new($code, $msg)
            .at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::FuzzyError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

/// Bail out early with an error
#[macro_export]
macro_rules! fuzzy_bail {
    ($code:expr, $msg:expr) => {
        return Err($crate::fuzzy_error!($code, $msg))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::fuzzy_error!($code, $fmt, $($arg)*))
    };
}

/// Ensure a condition holds, or return an error
#[macro_export]
macro_rules! fuzzy_ensure {
    ($cond:expr, $code:expr, $msg:expr) => {
        if !$cond {
            $crate::fuzzy_bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::fuzzy_bail!($code, $fmt, $($arg)*);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(FuzzyError::duplicate_variable("x").is_configuration());
        assert!(FuzzyError::undeclared_term("x", "hot").is_configuration());
        assert!(FuzzyError::rule_syntax("bad").is_configuration());
        assert!(FuzzyError::missing_input("x").is_evaluation());
        assert!(FuzzyError::degenerate("y").is_evaluation());
        assert!(!FuzzyError::config("io").is_configuration());
        assert!(!FuzzyError::config("io").is_evaluation());
    }

    #[test]
    fn test_error_with_context() {
        let err = FuzzyError::undeclared_term("cleanliness", "sparkling");
        assert_eq!(err.code, ErrorCode::UndeclaredTerm);
        assert_eq!(err.context_field("variable"), Some("cleanliness"));
        assert_eq!(err.context_field("term"), Some("sparkling"));
        assert_eq!(err.context_field("missing"), None);
    }

    #[test]
    fn test_degenerate_has_hint() {
        let err = FuzzyError::degenerate("customer_satisfaction");
        assert!(err.hint.is_some());
        assert!(err.message.contains("customer_satisfaction"));
    }

    #[test]
    fn test_error_display() {
        let err = FuzzyError::rule_syntax("expected ']'")
            .at("model.toml:12")
            .with_cause("unexpected end of input")
            .with_hint("terms are written as variable[term]");

        let display = err.to_string();
        assert!(display.contains("[1009]"));
        assert!(display.contains("expected ']'"));
        assert!(display.contains("model.toml:12"));
        assert!(display.contains("unexpected end of input"));
        assert!(display.contains("variable[term]"));
    }

    #[test]
    fn test_error_display_shows_context_fields() {
        let err = FuzzyError::undeclared_term("tip", "huge").with_context("rule", "rule2");
        assert_eq!(
            err.to_string(),
            "[1006] variable 'tip' has no term 'huge' (rule=rule2, term=huge, variable=tip)"
        );
    }

    #[test]
    fn test_error_to_json() {
        let err = FuzzyError::missing_input("service_quality");
        let json = err.to_json();
        assert!(json.contains("MISSING_INPUT"));
        assert!(json.contains("service_quality"));

        let back: FuzzyError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_error_to_json_pretty_keeps_field_order() {
        let err = FuzzyError::duplicate_term("service", "poor").with_context("rule", "rule1");
        let json = err.to_json_pretty();
        let variable = json.find("\"variable\"").unwrap();
        let term = json.find("\"term\"").unwrap();
        let rule = json.find("\"rule\"").unwrap();
        assert!(variable < term && term < rule);

        let back: FuzzyError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_macros_record_location() {
        fn fails() -> FuzzyResult<()> {
            fuzzy_ensure!(1 + 1 == 3, ErrorCode::InternalError, "arithmetic is {}", "broken");
            Ok(())
        }

        let err = fails().unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "arithmetic is broken");
        let location = err.context.and_then(|c| c.location).unwrap();
        assert!(location.contains("error.rs"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let err: FuzzyError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidConfigSyntax);
    }
}
