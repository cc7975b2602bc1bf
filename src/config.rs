//! Plugin configuration: launch arguments and logging settings.
//!
//! The host launches the plugin with four arguments (`-port`, `-pluginUUID`,
//! `-registerEvent`, `-info`), parsed into [`LaunchArgs`]. Logging follows
//! 12-factor style: settings come from environment variables (or a `.env`
//! file via `dotenvy`) and are collected in [`LogConfig`].
//!
//! | Variable               | Default | Meaning                                  |
//! |------------------------|---------|------------------------------------------|
//! | `STREAMDECK_LOG_LEVEL`  | `debug` | Filter directive when `RUST_LOG` unset   |
//! | `STREAMDECK_LOG_FILE`   | unset   | Log file, or directory for a timestamped file |
//! | `STREAMDECK_LOG_JSON`   | `false` | Emit JSON lines instead of plain text    |
//! | `STREAMDECK_LOG_STDERR` | `true`  | Also log to stderr                       |

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::error::SdkError;

/// Flags the host passes with a single leading dash.
const HOST_FLAGS: [&str; 4] = ["-port", "-pluginUUID", "-registerEvent", "-info"];

/// Arguments the host passes when launching the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "streamdeck-plugin", about = "Stream Deck plugin process")]
pub struct LaunchArgs {
    /// Port of the host WebSocket server on localhost.
    #[arg(long = "port")]
    pub port: u16,

    /// Unique identifier the host assigned to this plugin instance.
    #[arg(long = "pluginUUID")]
    pub plugin_uuid: String,

    /// Event name to use for the registration handshake.
    #[arg(long = "registerEvent")]
    pub register_event: String,

    /// Registration metadata as a JSON string.
    #[arg(long = "info")]
    pub info: String,
}

impl LaunchArgs {
    /// Parses the process arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidLaunchArgs`] when a flag is missing or
    /// `-port` is not a valid port number.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::try_parse_args(std::env::args_os())
    }

    /// Parses an explicit argument list; the first item is the program name.
    ///
    /// Both the host's single-dash form (`-port 28196`) and the conventional
    /// double-dash form (`--port 28196`) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidLaunchArgs`] when a flag is missing or
    /// `-port` is not a valid port number.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, SdkError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let normalized = args.into_iter().enumerate().map(|(position, arg)| {
            let arg: OsString = arg.into();
            if position > 0 && arg.to_str().is_some_and(|flag| HOST_FLAGS.contains(&flag)) {
                let mut long = OsString::from("-");
                long.push(&arg);
                long
            } else {
                arg
            }
        });
        Ok(Self::try_parse_from(normalized)?)
    }
}

/// Logging settings.
///
/// Loaded once at startup via [`LogConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set (e.g. `debug`).
    pub level: String,

    /// Log file path. A directory gets a timestamped file inside it.
    pub log_file: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable text.
    pub json: bool,

    /// Mirror logs to stderr.
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            log_file: None,
            json: false,
            stderr: true,
        }
    }
}

impl LogConfig {
    /// Loads logging settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key lookup, falling back to
    /// defaults for missing or invalid values.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let level = lookup("STREAMDECK_LOG_LEVEL")
            .filter(|level| !level.trim().is_empty())
            .unwrap_or(defaults.level);
        let log_file = lookup("STREAMDECK_LOG_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let json = parse_env_bool(&lookup, "STREAMDECK_LOG_JSON", defaults.json);
        let stderr = parse_env_bool(&lookup, "STREAMDECK_LOG_STDERR", defaults.stderr);

        Self {
            level,
            log_file,
            json,
            stderr,
        }
    }
}

/// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
/// `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
