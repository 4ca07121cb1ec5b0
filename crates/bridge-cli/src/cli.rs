use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bridgemap",
    about = "Build, merge and inspect write-once bridge maps",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a map from a JSON object and print the sealed result
    Materialize(MaterializeArgs),
    /// Merge the entries of SOURCE into TARGET and print the result
    Merge(MergeArgs),
}

#[derive(Args)]
pub struct MaterializeArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct MergeArgs {
    pub target: PathBuf,
    pub source: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_materialize() {
        let cli = Cli::try_parse_from(["bridgemap", "materialize", "doc.json"]).unwrap();
        if let Command::Materialize(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("doc.json"));
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_merge() {
        let cli = Cli::try_parse_from(["bridgemap", "merge", "a.json", "b.json"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.target, PathBuf::from("a.json"));
            assert_eq!(args.source, PathBuf::from("b.json"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn merge_requires_two_files() {
        assert!(Cli::try_parse_from(["bridgemap", "merge", "a.json"]).is_err());
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "bridgemap",
            "--verbose",
            "--format",
            "json",
            "--config",
            "engine.toml",
            "materialize",
            "doc.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("engine.toml")));
    }

    #[test]
    fn globals_after_subcommand() {
        let cli = Cli::try_parse_from(["bridgemap", "materialize", "doc.json", "--format", "json"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["bridgemap", "--format", "yaml", "materialize", "x"]).is_err());
    }
}
