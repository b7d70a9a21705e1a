//! Structured error handling with codes, context, and recovery suggestions
//!
//! Configuration-time errors are fatal by policy: the loader surfaces the
//! first error and halts before any task runs. Task-time errors fail that
//! invocation only.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,
    InvalidPath = 2003,

    // Settings errors (3xxx)
    SettingsError = 3000,
    SettingsNotFound = 3001,
    SettingsParseError = 3002,
    InvalidCoordinate = 3003,

    // Resolution errors (4xxx)
    ResolutionError = 4000,
    UnresolvableArtifact = 4001,
    NoRepositories = 4002,

    // Module errors (5xxx)
    ModuleError = 5000,
    UnresolvedModule = 5001,
    DuplicateModule = 5002,
    EvaluationCycle = 5003,

    // Task errors (6xxx)
    TaskError = 6000,
    UnknownTask = 6001,
    TaskFailed = 6002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Settings",
            4 => "Resolution",
            5 => "Module",
            6 => "Task",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    /// Generic IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    /// Generic settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SettingsError, message)
    }

    /// Settings file missing at an explicitly given path
    pub fn settings_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::SettingsNotFound,
            format!("Settings file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .buildcfg.toml file or use --config to specify a path")
    }

    /// Malformed artifact coordinate string
    pub fn invalid_coordinate(raw: &str) -> Self {
        Self::new(
            ErrorCode::InvalidCoordinate,
            format!("Invalid artifact coordinate: {raw}"),
        )
        .with_suggestion("Coordinates must have the form group:name:version")
    }

    /// Classpath coordinate not hosted by any declared repository
    pub fn unresolvable_artifact(coordinate: &str) -> Self {
        Self::new(
            ErrorCode::UnresolvableArtifact,
            format!("Cannot resolve {coordinate} from the declared repositories"),
        )
        .with_suggestion("Declare a repository that hosts this artifact's group")
    }

    /// No repositories declared at all
    pub fn no_repositories() -> Self {
        Self::new(
            ErrorCode::NoRepositories,
            "No repositories declared for plugin resolution",
        )
        .with_suggestion("Declare at least google and maven-central")
    }

    /// Ordering target does not exist in the project tree
    pub fn unresolved_module(path: &str) -> Self {
        Self::new(
            ErrorCode::UnresolvedModule,
            format!("Project with path '{path}' could not be found"),
        )
        .with_suggestion("Check that the module directory exists and contains a Gradle build file")
    }

    /// Module registered twice in the same tree
    pub fn duplicate_module(path: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateModule,
            format!("Project with path '{path}' is already registered"),
        )
    }

    /// Evaluation ordering constraints form a cycle
    pub fn evaluation_cycle(path: &str) -> Self {
        Self::new(
            ErrorCode::EvaluationCycle,
            format!("Circular evaluation ordering involving '{path}'"),
        )
    }

    /// Invocation of a task name that was never registered
    pub fn unknown_task(name: &str) -> Self {
        Self::new(ErrorCode::UnknownTask, format!("Task '{name}' not found"))
    }

    /// A registered task ran and failed
    pub fn task_failed(name: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::TaskFailed,
            format!("Task '{name}' failed: {}", message.into()),
        )
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Error code as display string (`E3002`)
    pub code_str: String,
    /// Error category name
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source error rendered to a string, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command completed
    pub const SUCCESS: i32 = 0;
    /// Generic failure
    pub const FAILURE: i32 = 1;
    /// Settings could not be loaded or parsed
    pub const SETTINGS_ERROR: i32 = 3;
    /// Classpath coordinate unresolvable
    pub const RESOLUTION_ERROR: i32 = 4;
    /// Module reference or ordering failure
    pub const MODULE_ERROR: i32 = 5;
    /// Task execution failure
    pub const TASK_ERROR: i32 = 6;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(
            ErrorCode::SettingsParseError,
            format!("TOML parse error: {}", err),
        )
        .with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(
            ErrorCode::SettingsParseError,
            format!("JSON error: {}", err),
        )
        .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error, if any
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::UnresolvableArtifact.to_string(), "E4001");
        assert_eq!(ErrorCode::UnresolvedModule.to_string(), "E5001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::SettingsParseError.category(), "Settings");
        assert_eq!(ErrorCode::UnknownTask.category(), "Task");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::unresolved_module(":app").with_context("While ordering sub-modules");

        assert_eq!(err.code, ErrorCode::UnresolvedModule);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::unresolvable_artifact("com.google.gms:google-services:4.4.0")
            .with_context("During buildscript configuration");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E4001"));
        assert!(json.contains("Resolution"));
    }

    #[test]
    fn test_io_error_kind_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }
}
