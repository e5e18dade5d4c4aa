//! Bluprint Logging
//!
//! Installs the process-wide `tracing` subscriber for a Bluprint service.
//! Every Bluprint crate logs through `tracing` macros; this crate only decides
//! where those events go and which of them are kept.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bluprint_log::{LogConfig, Level};
//!
//! let config = LogConfig::new("billing").with_level(Level::Debug);
//! bluprint_log::init(&config).ok();
//!
//! tracing::info!(tenant = "acme", "Resolved tenant settings");
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Full filter override (takes precedence over the settings level)
//! - `BLUPRINT_LOG_FORMAT=json|pretty|compact` - Output format (default `json`)
//! - `BLUPRINT_LOG_LEVEL` - Level used when no `LOG_LEVEL` setting is provided

use std::env;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the service log level.
const FRAMEWORK_TARGETS: &[&str] = &[
    "bluprint",
    "bluprint_cache",
    "bluprint_config",
    "bluprint_jwt",
    "bluprint_log",
    "bluprint_tenancy",
];

// ============================================================================
// Log Levels
// ============================================================================

/// Log level for Bluprint services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level (least verbose)
    Error = 4,
    /// Off (no logging)
    Off = 5,
}

impl Level {
    /// Parse a level name or a numeric level.
    ///
    /// Names are case-insensitive and include the `WARNING` and `CRITICAL`
    /// spellings used by settings files. Numeric levels follow the
    /// 10/20/30/40/50 scale (`DEBUG` .. `CRITICAL`).
    ///
    /// ```
    /// use bluprint_log::Level;
    ///
    /// assert_eq!(Level::parse("WARNING"), Some(Level::Warn));
    /// assert_eq!(Level::parse("20"), Some(Level::Info));
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(numeric) = s.parse::<u32>() {
            return Some(Self::from_numeric(numeric));
        }

        match s.to_lowercase().as_str() {
            "trace" | "notset" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" | "critical" | "fatal" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    fn from_numeric(level: u32) -> Self {
        match level {
            40.. => Level::Error,
            30..=39 => Level::Warn,
            20..=29 => Level::Info,
            10..=19 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Filter directive name understood by `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_directive().to_uppercase())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable output
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl Format {
    /// Get format from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Project name; its crate target follows `level`
    pub project: String,
    /// Minimum level for the project and Bluprint crates
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether ANSI colors are used by the text formats
    pub ansi: bool,
}

impl LogConfig {
    /// Create a configuration for a project with `INFO` level and the
    /// format taken from `BLUPRINT_LOG_FORMAT`.
    pub fn new(project: impl Into<String>) -> Self {
        let format = env::var("BLUPRINT_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        let level = env::var("BLUPRINT_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(Level::Info);

        Self {
            project: project.into(),
            level,
            format,
            ansi: env::var("NO_COLOR").is_err(),
        }
    }

    /// Create a configuration from a `LOG_LEVEL` settings value.
    ///
    /// Unknown level strings fall back to `INFO`.
    pub fn from_settings(project: impl Into<String>, log_level: &str) -> Self {
        let config = Self::new(project);
        let level = Level::parse(log_level).unwrap_or(Level::Info);
        config.with_level(level)
    }

    /// Set the level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Build the filter directives: dependencies stay at `warn`, the project
    /// and the Bluprint crates follow the configured level.
    pub fn directives(&self) -> String {
        let level = self.level.as_directive();
        let mut directives = vec!["warn".to_string()];

        let project_target = self.project.replace('-', "_");
        if !project_target.is_empty() && !FRAMEWORK_TARGETS.contains(&project_target.as_str()) {
            directives.push(format!("{}={}", project_target, level));
        }

        directives.extend(
            FRAMEWORK_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, level)),
        );

        directives.join(",")
    }

    fn filter(&self) -> Result<EnvFilter, LogError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(self.directives()).map_err(|e| LogError::InvalidFilter(e.to_string()))
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Install the global subscriber.
///
/// Returns [`LogError::AlreadyInitialized`] when a subscriber is already set,
/// which callers running several services in one process may ignore.
pub fn init(config: &LogConfig) -> Result<(), LogError> {
    let filter = config.filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.format {
        Format::Pretty => builder.pretty().with_ansi(config.ansi).try_init(),
        Format::Compact => builder.compact().with_ansi(config.ansi).try_init(),
        #[cfg(feature = "json")]
        Format::Json => builder.json().with_current_span(false).try_init(),
        #[cfg(not(feature = "json"))]
        Format::Json => builder.compact().with_ansi(false).try_init(),
    };

    result.map_err(|_| LogError::AlreadyInitialized)?;
    tracing::debug!(project = %config.project, level = %config.level, "Logging initialized");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse_names() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("CRITICAL"), Some(Level::Error));
        assert_eq!(Level::parse(" info "), Some(Level::Info));
        assert_eq!(Level::parse("invalid"), None);
    }

    #[test]
    fn test_level_parse_numeric() {
        assert_eq!(Level::parse("10"), Some(Level::Debug));
        assert_eq!(Level::parse("20"), Some(Level::Info));
        assert_eq!(Level::parse("30"), Some(Level::Warn));
        assert_eq!(Level::parse("40"), Some(Level::Error));
        assert_eq!(Level::parse("50"), Some(Level::Error));
        assert_eq!(Level::parse("0"), Some(Level::Trace));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("compact"), Some(Format::Compact));
        assert_eq!(Format::parse("JSON"), Some(Format::Json));
        assert_eq!(Format::parse("invalid"), None);
    }

    #[test]
    fn test_from_settings_unknown_level_falls_back() {
        let config = LogConfig::from_settings("billing", "LOUD");
        assert_eq!(config.level, Level::Info);
    }

    #[test]
    fn test_directives_follow_project() {
        let config = LogConfig::new("billing-api").with_level(Level::Debug);
        let directives = config.directives();

        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("billing_api=debug"));
        assert!(directives.contains("bluprint_tenancy=debug"));
    }

    #[test]
    fn test_directives_do_not_duplicate_framework_target() {
        let config = LogConfig::new("bluprint").with_level(Level::Error);
        let directives = config.directives();

        assert_eq!(directives.matches("bluprint=error").count(), 1);
    }
}
