//! `gear init` command - Project initialization

use console::style;
use miette::Result;

use crate::core::project::{Project, ProjectError};
use crate::core::EntityPrefix;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Reinitialize, rewriting the project config
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| miette::miette!("{}", e))?;

    match Project::init(&cwd, args.force) {
        Ok(project) => {
            println!(
                "{} Initialized gear project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created:");
            println!("  .gear/config.yaml");
            for prefix in EntityPrefix::all() {
                println!("  {}/", prefix.dir());
            }
            println!();
            println!(
                "Add your first item with: {}",
                style("gear eqp new --name \"Sony A7S III\"").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Project already exists at {}",
                style("!").yellow(),
                path.display()
            );
            println!("  Use {} to reinitialize.", style("--force").cyan());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
