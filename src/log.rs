use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;

/// environment variable selecting the minimum level of the default logger
pub const LOG_ENV_VAR: &str = "LOOKAROUND_LOG";

/// environment variable which, when present, disables ANSI colour in the default logger
pub const NO_COLOR_ENV_VAR: &str = "NO_COLOR";

lazy_static! {
    static ref ENV_LOGGER: Option<Logger> = Logger::from_env();
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Verbose,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    fn as_ansi(self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[38;5;6m",
            LogLevel::Verbose => "\x1b[38;5;8m",
            LogLevel::Info => "\x1b[39m",
            LogLevel::Warn => "\x1b[38;5;3m",
            LogLevel::Error => "\x1b[38;5;1m",
            LogLevel::Fatal => "\x1b[38;5;0;48;5;1m",
        }
    }

    fn as_pre(self) -> &'static str {
        match self {
            LogLevel::Debug => "[DBG] ",
            LogLevel::Verbose => "[VRB] ",
            LogLevel::Info => "[INF] ",
            LogLevel::Warn => "[WRN] ",
            LogLevel::Error => "[ERR] ",
            LogLevel::Fatal => "[FTL] ",
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "verbose" | "vrb" => Ok(LogLevel::Verbose),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "wrn" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            "fatal" | "ftl" => Ok(LogLevel::Fatal),
            other => Err(anyhow::anyhow!("Unknown log level {other:?}")),
        }
    }
}

/// Levelled diagnostics sink shared by every cursor over one buffer.
///
/// Everything is written to stderr so that a consumer's stdout is never polluted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Logger {
    use_ansi_color: bool,
    minimum_level: LogLevel,
}

impl Logger {
    pub fn new(use_ansi_color: bool, minimum_level: LogLevel) -> Self {
        Self {
            use_ansi_color,
            minimum_level,
        }
    }

    /// logger configured from [`LOG_ENV_VAR`] and [`NO_COLOR_ENV_VAR`], read once per process.
    ///
    /// `None` when the variable is unset, set to `off`, or does not name a level
    pub fn from_env_cached() -> Option<Logger> {
        *ENV_LOGGER
    }

    fn from_env() -> Option<Logger> {
        let level = std::env::var(LOG_ENV_VAR).ok()?;
        if level.trim().eq_ignore_ascii_case("off") {
            return None;
        }

        let minimum_level = match level.parse() {
            Ok(l) => l,
            Err(e) => {
                eprintln!("{}{e}, logging disabled", LogLevel::Warn.as_pre());
                return None;
            }
        };

        let use_ansi_color = std::env::var_os(NO_COLOR_ENV_VAR).is_none();

        Some(Self::new(use_ansi_color, minimum_level))
    }

    pub fn enabled(self, level: LogLevel) -> bool {
        level >= self.minimum_level
    }

    /// format a single log line, without the trailing newline
    pub fn render<T: Display>(self, level: LogLevel, message: T) -> String {
        if self.use_ansi_color {
            format!("{}{}{message}\x1b[0m", level.as_ansi(), level.as_pre())
        } else {
            format!("{}{message}", level.as_pre())
        }
    }

    pub fn log<T: Display>(self, level: LogLevel, message: T) {
        if !self.enabled(level) {
            return;
        }

        eprintln!("{}", self.render(level, message));
    }

    pub fn debug<T: Display>(self, message: T) {
        self.log(LogLevel::Debug, message);
    }

    pub fn verbose<T: Display>(self, message: T) {
        self.log(LogLevel::Verbose, message);
    }

    pub fn warn<T: Display>(self, message: T) {
        self.log(LogLevel::Warn, message);
    }

}
