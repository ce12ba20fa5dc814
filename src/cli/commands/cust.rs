//! `gear cust` command - Customer records

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{
    output_new_entity, print_no_results, print_structured, print_structured_list, rule, Context,
};
use crate::cli::helpers::{confirm, non_empty};
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{Customer, Rental};

#[derive(Subcommand, Debug)]
pub enum CustCommands {
    /// List customers
    List,

    /// Add a customer
    New(NewArgs),

    /// Show a customer and their rentals
    Show(RefArgs),

    /// Delete a customer
    Delete(DeleteArgs),
}

const CUS_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("company", "COMPANY", 24),
    ColumnDef::new("email", "EMAIL", 28),
    ColumnDef::new("phone", "PHONE", 16),
];

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Contact name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Production company
    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Customer id or id fragment
    pub reference: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Customer id or id fragment
    pub reference: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: CustCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CustCommands::List => run_list(global),
        CustCommands::New(args) => run_new(args, global),
        CustCommands::Show(args) => run_show(args, global),
        CustCommands::Delete(args) => run_delete(args),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let mut customers = ctx.store.load_all::<Customer>().into_diagnostic()?;
    customers.sort_by_key(|c| c.name.to_lowercase());

    let format = effective_format(global.format, true);
    if print_structured_list(&customers, format)? {
        return Ok(());
    }
    if customers.is_empty() && format == OutputFormat::Table {
        print_no_results("customers", "gear cust new --name <NAME>");
        return Ok(());
    }

    let rows: Vec<TableRow> = customers
        .iter()
        .map(|c| {
            TableRow::new(c.id.clone())
                .cell("id", CellValue::Id(c.id.clone()))
                .cell("name", CellValue::Text(c.name.clone()))
                .cell("company", CellValue::Text(c.company.clone().unwrap_or_default()))
                .cell("email", CellValue::Text(c.email.clone().unwrap_or_default()))
                .cell("phone", CellValue::Text(c.phone.clone().unwrap_or_default()))
        })
        .collect();
    TableFormatter::new(CUS_COLUMNS, "customer(s)").output(&rows, format, &[])
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let name = args.name.trim();
    if name.is_empty() {
        return Err(miette::miette!("--name cannot be empty"));
    }

    let existing = ctx.store.load_all::<Customer>().into_diagnostic()?;
    if let Some(dup) = existing
        .iter()
        .find(|c| c.name.trim().eq_ignore_ascii_case(name))
    {
        eprintln!(
            "{} A customer named '{}' already exists ({})",
            style("!").yellow(),
            dup.name,
            dup.id
        );
    }

    let mut customer = Customer::new(name, ctx.actor.display());
    customer.email = non_empty(args.email);
    customer.phone = non_empty(args.phone);
    customer.company = non_empty(args.company);
    customer.notes = non_empty(args.notes);

    let path = ctx.store.create(&customer).into_diagnostic()?;
    output_new_entity(
        &customer.id,
        &path,
        "customer",
        &customer.display_name(),
        None,
        global,
    );
    Ok(())
}

/// Rentals recorded for a customer, newest first
fn rentals_for(rentals: Vec<Rental>, customer: &Customer) -> Vec<Rental> {
    let mut list: Vec<Rental> = rentals
        .into_iter()
        .filter(|r| match &r.customer {
            Some(id) => *id == customer.id,
            None => r.customer_name.trim().eq_ignore_ascii_case(customer.name.trim()),
        })
        .collect();
    list.reverse();
    list
}

fn run_show(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let customer: Customer = ctx.store.find(&args.reference).into_diagnostic()?;

    if print_structured(&customer, global.format)? {
        return Ok(());
    }

    println!("{}", rule());
    println!("{}: {}", style("ID").bold(), style(&customer.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&customer.name).yellow());
    if let Some(ref company) = customer.company {
        println!("{}: {}", style("Company").bold(), company);
    }
    if let Some(ref email) = customer.email {
        println!("{}: {}", style("Email").bold(), email);
    }
    if let Some(ref phone) = customer.phone {
        println!("{}: {}", style("Phone").bold(), phone);
    }
    println!("{}", rule());

    let rentals = rentals_for(
        ctx.store.load_all::<Rental>().into_diagnostic()?,
        &customer,
    );
    if !rentals.is_empty() {
        println!();
        println!("{} ({}):", style("Rentals").bold(), rentals.len());
        for r in &rentals {
            let status = if r.is_active() {
                style(r.status.to_string()).yellow()
            } else {
                style(r.status.to_string()).dim()
            };
            println!(
                "  • {} {} [{}]",
                r.start_date.format("%Y-%m-%d"),
                r.equipment_name,
                status
            );
        }
    }

    if let Some(ref notes) = customer.notes {
        println!();
        println!("{}", style("Notes:").bold());
        println!("{}", notes);
    }
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let ctx = Context::discover()?;
    let customer: Customer = ctx.store.find(&args.reference).into_diagnostic()?;

    let active = rentals_for(
        ctx.store.load_all::<Rental>().into_diagnostic()?,
        &customer,
    )
    .iter()
    .filter(|r| r.is_active())
    .count();
    if active > 0 {
        return Err(miette::miette!(
            "{} has {} active rental(s); return them first",
            customer.name,
            active
        ));
    }

    if !confirm(&format!("Delete customer {}?", customer.name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.store
        .delete::<Customer>(&customer.id)
        .into_diagnostic()?;
    println!(
        "{} Deleted customer {} {}",
        style("✓").green(),
        customer.name,
        style(&customer.id).dim()
    );
    Ok(())
}
