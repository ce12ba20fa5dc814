//! `gear scan` command - Resolve a scanned label

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{print_structured, Context};
use crate::cli::GlobalOpts;
use crate::core::lookup::{ensure_in_stock, lookup_equipment, LookupVia};

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Scanned short code or equipment id
    pub code: String,
}

pub fn run(args: ScanArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let hit = lookup_equipment(&ctx.store, &args.code).into_diagnostic()?;
    ensure_in_stock(&hit.equipment).into_diagnostic()?;

    if !print_structured(&hit.equipment, global.format)? {
        let via = match hit.via {
            LookupVia::ShortCode => style(hit.via.to_string()).green(),
            LookupVia::PrimaryId => style(hit.via.to_string()).cyan(),
        };
        println!("{} Found by {}", style("✓").green(), via);
        super::eqp::print_equipment(&ctx.store, &hit.equipment)?;
    }

    if !hit.collisions.is_empty() {
        eprintln!(
            "{} {} other item(s) share code {}; scan the id to pick one:",
            style("!").yellow(),
            hit.collisions.len(),
            hit.equipment.short_code
        );
        for id in &hit.collisions {
            eprintln!("  {}", id);
        }
    }

    if hit.equipment.is_rented() {
        eprintln!(
            "{} {} is on rental; return it with {}",
            style("!").yellow(),
            hit.equipment.name,
            style("gear rent return <rental>").yellow()
        );
    }
    Ok(())
}
