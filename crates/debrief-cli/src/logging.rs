//! Logging configuration and initialization.
//!
//! Presets map the CLI verbosity flags onto filter directives; an explicit
//! `RUST_LOG` always wins.

use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Warnings and errors only.
    Quiet,
    /// Important events.
    #[default]
    Production,
    /// Operational detail.
    Verbose,
    /// Everything, including per-line ingestion traces.
    Debug,
}

impl LogPreset {
    fn directives(self) -> &'static str {
        match self {
            LogPreset::Quiet => "warn",
            LogPreset::Production => "warn,debrief=info",
            LogPreset::Verbose => "info,debrief=debug",
            LogPreset::Debug => "debug,debrief=trace",
        }
    }
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    pub format: LogFormat,
}

impl LogConfig {
    /// Determine the preset from CLI flags; the most verbose flag wins.
    pub fn from_cli(verbose: bool, debug: bool, quiet: bool, format: LogFormat) -> Self {
        let preset = if debug {
            LogPreset::Debug
        } else if verbose {
            LogPreset::Verbose
        } else if quiet {
            LogPreset::Quiet
        } else {
            LogPreset::Production
        };
        Self { preset, format }
    }
}

/// Initialize the global subscriber.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.preset.directives()));

    match config.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_most_verbose_flag_wins() {
        let config = LogConfig::from_cli(true, true, true, LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Debug);
        let config = LogConfig::from_cli(false, false, true, LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Quiet);
        let config = LogConfig::from_cli(false, false, false, LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Production);
    }
}
