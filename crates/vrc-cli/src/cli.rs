//! Command line surface.

use clap::{Parser, Subcommand};

/// Start remote dev environments from container images.
#[derive(Debug, Parser)]
#[command(name = "vrc", version, about = "Virtual remote container client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs a dev env for image name
    Run {
        /// Image to run, without tag
        #[arg(value_name = "IMAGE_NAME")]
        image_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["vrc", "run", "thunderbolt"]).unwrap();
        let Command::Run { image_name } = cli.command;
        assert_eq!(image_name, "thunderbolt");
    }

    #[test]
    fn test_run_requires_image() {
        assert!(Cli::try_parse_from(["vrc", "run"]).is_err());
        assert!(Cli::try_parse_from(["vrc"]).is_err());
        assert!(Cli::try_parse_from(["vrc", "run", "a", "b"]).is_err());
    }
}
