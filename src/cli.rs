use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Shape of the `logger` section in the config file.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigShape {
    /// Categories are direct children of `logger`.
    #[default]
    Flat,
    /// Categories are grouped one namespace level below `logger`.
    Nested,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config JSON file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Shape of the `logger` section in the config file
    #[arg(long, value_enum, default_value_t)]
    pub shape: ConfigShape,

    /// Enable debug logging for internal details
    #[arg(short, long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag_is_required() {
        let result = Cli::try_parse_from(["diaglog"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_shape_defaults_to_flat() {
        let cli = Cli::try_parse_from(["diaglog", "--config", "conf.json"]).unwrap();
        assert_eq!(cli.shape, ConfigShape::Flat);
        assert!(!cli.debug);
    }

    #[test]
    fn test_nested_shape_and_short_config_flag() {
        let cli = Cli::try_parse_from(["diaglog", "-c", "conf.json", "--shape", "nested"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("conf.json"));
        assert_eq!(cli.shape, ConfigShape::Nested);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result = Cli::try_parse_from(["diaglog", "-c", "conf.json", "--bogus"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_short_circuits() {
        let result = Cli::try_parse_from(["diaglog", "--help"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }
}
