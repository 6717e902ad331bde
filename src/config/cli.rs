use crate::domain::model::ClonePolicy;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "small-utils")]
#[command(about = "Date formatting, dated log lines and deep copies of JSON data")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the UTC calendar date as YYYY-MM-DD
    Date {
        #[arg(long, conflicts_with = "millis", help = "RFC 3339 instant instead of now")]
        at: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Milliseconds since the Unix epoch")]
        millis: Option<i64>,
    },

    /// Print "[YYYY-MM-DD] <message>" to stdout
    Log {
        #[arg(long, help = "RFC 3339 instant instead of now")]
        at: Option<String>,

        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },

    /// Deep-clone a JSON document and print the copy
    Clone {
        #[arg(long, help = "JSON file to read; stdin when omitted")]
        input: Option<PathBuf>,

        #[arg(long, value_enum)]
        policy: Option<ClonePolicy>,

        #[arg(long)]
        max_depth: Option<usize>,

        #[arg(long)]
        pretty: bool,
    },
}

impl Command {
    pub fn message(&self) -> Option<String> {
        match self {
            Command::Log { message, .. } => Some(message.join(" ")),
            _ => None,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validation::validate_path("--config", &path.to_string_lossy())?;
        }
        if let Command::Clone {
            input: Some(path), ..
        } = &self.command
        {
            validation::validate_path("--input", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_command() {
        let cli = CliConfig::try_parse_from(["small-utils", "date", "--at", "2023-07-04T15:30:00Z"])
            .unwrap();
        match cli.command {
            Command::Date { at, millis } => {
                assert_eq!(at.as_deref(), Some("2023-07-04T15:30:00Z"));
                assert!(millis.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_date_flags_conflict() {
        let result =
            CliConfig::try_parse_from(["small-utils", "date", "--at", "x", "--millis", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_millis() {
        let cli = CliConfig::try_parse_from(["small-utils", "date", "--millis", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Date { millis: Some(-1), .. }));
    }

    #[test]
    fn test_log_message_is_joined() {
        let cli = CliConfig::try_parse_from(["small-utils", "log", "hello", "there"]).unwrap();
        assert_eq!(cli.command.message().as_deref(), Some("hello there"));

        let cli = CliConfig::try_parse_from(["small-utils", "log"]).unwrap();
        assert_eq!(cli.command.message().as_deref(), Some(""));
    }

    #[test]
    fn test_parse_clone_command_with_global_flags() {
        let cli = CliConfig::try_parse_from([
            "small-utils",
            "clone",
            "--policy",
            "lenient",
            "--max-depth",
            "8",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match &cli.command {
            Command::Clone {
                policy, max_depth, ..
            } => {
                assert_eq!(*policy, Some(ClonePolicy::Lenient));
                assert_eq!(*max_depth, Some(8));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_empty_input_path_is_rejected() {
        let cli = CliConfig {
            config: None,
            verbose: false,
            command: Command::Clone {
                input: Some(PathBuf::new()),
                policy: None,
                max_depth: None,
                pretty: false,
            },
        };
        assert!(cli.validate().is_err());
    }
}
