use crate::log::Logger;

/// Settings shared by every cursor over one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// character which ends a line for line/column tracking
    pub line_feed: char,

    /// diagnostics sink, `None` disables logging entirely
    pub logger: Option<Logger>,
}

impl Default for Config {
    /// line feed `'\n'`, logger taken from the environment (see [`Logger::from_env_cached`])
    fn default() -> Self {
        Self {
            line_feed: '\n',
            logger: Logger::from_env_cached(),
        }
    }
}

impl Config {
    /// configuration with logging disabled regardless of the environment
    pub fn quiet() -> Self {
        Self {
            logger: None,
            ..Self::default()
        }
    }

    pub fn with_line_feed(self, line_feed: char) -> Self {
        Self { line_feed, ..self }
    }

    pub fn with_logger(self, logger: Option<Logger>) -> Self {
        Self { logger, ..self }
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use crate::log::{LogLevel, Logger};

    #[test]
    fn builders_replace_single_fields() {
        let logger = Logger::new(false, LogLevel::Info);
        let config = Config::quiet().with_line_feed('\r').with_logger(Some(logger));

        assert_eq!(config.line_feed, '\r');
        assert_eq!(config.logger, Some(logger));
        assert_eq!(Config::quiet().logger, None);
        assert_eq!(Config::quiet().line_feed, '\n');
    }
}
