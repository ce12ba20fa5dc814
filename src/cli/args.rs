//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, cust::CustCommands, dash::DashArgs, emp::EmpCommands,
    eqp::EqpCommands, init::InitArgs, rent::RentCommands, scan::ScanArgs,
    validate::ValidateArgs,
};
use crate::core::logging::Verbosity;

#[derive(Parser, Debug)]
#[command(name = "gear")]
#[command(author, version)]
#[command(about = "Plain-text equipment rental desk", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// More log output on stderr (repeat for more)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl GlobalOpts {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new gear project in the current directory
    Init(InitArgs),

    /// Equipment inventory
    #[command(subcommand)]
    Eqp(EqpCommands),

    /// Look up a scanned short code or id
    Scan(ScanArgs),

    /// Rentals and returns
    #[command(subcommand)]
    Rent(RentCommands),

    /// Customers
    #[command(subcommand)]
    Cust(CustCommands),

    /// Rental desk staff
    #[command(subcommand)]
    Emp(EmpCommands),

    /// Front-desk summary
    Dash(DashArgs),

    /// Check record files against their schemas
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for lists, details for single records
    #[default]
    Auto,
    /// Bordered table
    Table,
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// Ids only, one per line
    Id,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gear", "eqp", "list", "-f", "json", "-vv"]).unwrap();
        assert_eq!(cli.global.format, OutputFormat::Json);
        assert_eq!(cli.global.verbosity(), Verbosity::Debug);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["gear", "-q", "-v", "dash"]).is_err());
    }
}
