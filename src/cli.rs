use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, FromArgMatches, Parser};

use crate::config::AppConfig;

/// Terminal menus for VirtualBox on a remote host, driven over ssh.
#[derive(Debug, Parser)]
#[command(name = "vtui", version, about)]
pub struct Cli {
    /// SSH alias of the VirtualBox host
    #[arg(long)]
    pub hostname: String,
}

impl Cli {
    /// The clap command with `--hostname` limited to the configured aliases.
    pub fn command_for(config: &AppConfig) -> clap::Command {
        Self::command().mut_arg("hostname", |arg| {
            arg.value_parser(PossibleValuesParser::new(config.hosts.clone()))
                .default_value(config.default_host.clone())
                .required(false)
        })
    }

    pub fn parse_for(config: &AppConfig) -> Self {
        Self::try_parse_for(config, std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_for<I, T>(config: &AppConfig, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::command_for(config).try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }
}
