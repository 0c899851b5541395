//! Command-line surface: global flags, then `<command> <address> <api_key> [args...]`.

use clap::Parser;
use std::path::PathBuf;

/// PrusaLink bridge CLI
#[derive(Parser, Debug)]
#[command(
    name = "prusalink-bridge",
    version,
    about = "Run one command against a PrusaLink printer and print a JSON result."
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (non-numeric values fall back to the default)
    #[arg(long)]
    pub timeout: Option<String>,

    /// Log level for diagnostics written to stderr
    #[arg(long)]
    pub log_level: Option<String>,

    /// status | upload <file> [remote] [print-after] | print <file> | stop | connect,
    /// each preceded by <address> <api_key>
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND ADDRESS API_KEY ARGS"
    )]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_before_command() {
        let cli = Cli::try_parse_from([
            "prusalink-bridge",
            "--timeout",
            "60",
            "upload",
            "10.0.0.5",
            "key",
            "a.gcode",
            "b.gcode",
            "true",
        ])
        .unwrap();
        assert_eq!(cli.timeout.as_deref(), Some("60"));
        assert_eq!(cli.args, vec!["upload", "10.0.0.5", "key", "a.gcode", "b.gcode", "true"]);
    }

    #[test]
    fn test_hyphenated_values_after_command() {
        let cli =
            Cli::try_parse_from(["prusalink-bridge", "status", "10.0.0.5", "-abc123"]).unwrap();
        assert_eq!(cli.args, vec!["status", "10.0.0.5", "-abc123"]);
    }

    #[test]
    fn test_empty_command_line_parses() {
        let cli = Cli::try_parse_from(["prusalink-bridge"]).unwrap();
        assert!(cli.args.is_empty());
        assert!(cli.config.is_none());
    }
}
