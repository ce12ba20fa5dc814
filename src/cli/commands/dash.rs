//! `gear dash` command - Front-desk summary

use chrono::Utc;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{rule, Context};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Summary;

#[derive(clap::Args, Debug)]
pub struct DashArgs {}

pub fn run(_args: DashArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let summary = Summary::compute(&ctx.store, Utc::now().date_naive()).into_diagnostic()?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&summary).into_diagnostic()?);
        }
        _ => print_summary(&summary),
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("{}", style("Rental Desk").bold());
    println!("{}", rule());
    println!(
        "  Equipment:       {} ({} on rental)",
        style(summary.total_equipment).cyan(),
        style(summary.rented_equipment).yellow()
    );
    println!(
        "  Active rentals:  {}",
        style(summary.active_rentals).cyan()
    );
    let due = if summary.due_today > 0 {
        style(summary.due_today).red()
    } else {
        style(summary.due_today).green()
    };
    println!("  Due today:       {}", due);
    println!(
        "  Customers:       {}",
        style(summary.total_customers).cyan()
    );

    if !summary.due_today_items.is_empty() {
        println!();
        println!("{}", style("Due back today:").bold());
        for item in &summary.due_today_items {
            println!(
                "  • {} from {}",
                style(&item.equipment_name).yellow(),
                item.customer_name
            );
        }
        if summary.due_today > summary.due_today_items.len() {
            println!(
                "  {}",
                style(format!(
                    "...and {} more (gear rent due)",
                    summary.due_today - summary.due_today_items.len()
                ))
                .dim()
            );
        }
    }

    if !summary.out_of_stock.is_empty() {
        println!();
        println!("{}", style("Out of stock:").bold());
        for alert in &summary.out_of_stock {
            println!(
                "  {} {} (stock {})",
                style("!").red(),
                alert.name,
                alert.stock
            );
        }
    }
    println!("{}", rule());
}
