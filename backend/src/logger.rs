use std::sync::OnceLock;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages including debug output
///
/// Read from the `LOG_LEVEL` environment variable when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive)
    ///
    /// Valid values: "silent", "error", "warn", "info", "debug"
    /// Returns None if the string doesn't match a valid level.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }

    /// The `EnvFilter` directive for this level.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Level::Silent => "off",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

fn env_filter() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| Level::from_str(&v))
        .unwrap_or(Level::Info);

    EnvFilter::new(level.filter_directive())
}

/// Install the global `tracing` subscriber. Safe to call more than once,
/// only the first call has an effect.
///
/// Log lines go to stderr so that command output on stdout stays clean.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

// Utility function to format duration as HH:MM:SS
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::from_str(" warn "), Some(Level::Warn));
        assert_eq!(Level::from_str("silent"), Some(Level::Silent));
        assert_eq!(Level::from_str("verbose"), None);
        assert!(Level::Debug > Level::Info);
        assert_eq!(Level::Silent.filter_directive(), "off");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_duration(Duration::from_secs(59)), "00:00:59");
        assert_eq!(format_duration(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_duration(Duration::from_millis(90_500)), "00:01:30");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialized");
    }
}
