use clap::Parser;
use gear::cli::commands;
use gear::cli::{Cli, Commands};
use gear::core::logging::init_logging;
use miette::Result;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.global.verbosity());

    let global = &cli.global;
    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Eqp(cmd) => commands::eqp::run(cmd, global),
        Commands::Scan(args) => commands::scan::run(args, global),
        Commands::Rent(cmd) => commands::rent::run(cmd, global),
        Commands::Cust(cmd) => commands::cust::run(cmd, global),
        Commands::Emp(cmd) => commands::emp::run(cmd, global),
        Commands::Dash(args) => commands::dash::run(args, global),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
