use crate::config::ActionConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "setup-kced")]
#[command(about = "Install kced from the go-apiops releases into the runner tool cache")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: ActionConfig,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an installed binary and record its output as step outputs
    Wrap {
        #[arg(long)]
        binary: PathBuf,

        #[arg(last = true)]
        args: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_wrap_subcommand() {
        let cli = Cli::try_parse_from([
            "setup-kced",
            "wrap",
            "--binary",
            "/opt/kced",
            "--",
            "patch",
            "--state",
            "kong.yaml",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Wrap { binary, args }) => {
                assert_eq!(binary, PathBuf::from("/opt/kced"));
                assert_eq!(args, vec!["patch", "--state", "kong.yaml"]);
            }
            None => panic!("expected wrap subcommand"),
        }
    }

    #[test]
    fn test_no_subcommand_installs() {
        let cli = Cli::try_parse_from(["setup-kced", "--kced-version", "0.1.11"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.kced_version, "0.1.11");
    }
}
