//! `gear rent` command - Checkouts and returns

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{print_no_results, print_structured, print_structured_list, Context};
use crate::cli::helpers::{confirm, non_empty, parse_date};
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup::resolve_equipment;
use crate::core::rental::{active_rentals, check_in, checkout, deliveries, CheckoutRequest};
use crate::core::store::{Store, StoreError};
use crate::entities::{Customer, DueState, Rental};

#[derive(Subcommand, Debug)]
pub enum RentCommands {
    /// List rentals (active only by default)
    List(ListArgs),

    /// Check an item out to a customer
    New(NewArgs),

    /// Check an item back in
    Return(ReturnArgs),

    /// Active rentals by due date
    Due,
}

const RNT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("equipment", "EQUIPMENT", 28),
    ColumnDef::new("customer", "CUSTOMER", 24),
    ColumnDef::new("location", "LOCATION", 20),
    ColumnDef::new("start", "START", 10),
    ColumnDef::new("due", "DUE", 10),
    ColumnDef::new("state", "STATE", 11),
    ColumnDef::new("status", "STATUS", 9),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Include completed rentals
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Equipment short code, id, or id fragment
    pub equipment: String,

    /// Customer name or customer id
    #[arg(long)]
    pub customer: String,

    /// Shoot location / delivery address
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Planned return date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub until: Option<NaiveDate>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ReturnArgs {
    /// Rental id or id fragment
    pub rental: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: RentCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RentCommands::List(args) => run_list(args, global),
        RentCommands::New(args) => run_new(args, global),
        RentCommands::Return(args) => run_return(args, global),
        RentCommands::Due => run_due(global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let today = Utc::now().date_naive();

    let rentals = if args.all {
        let mut all = ctx.store.load_all::<Rental>().into_diagnostic()?;
        all.reverse();
        all
    } else {
        active_rentals(&ctx.store).into_diagnostic()?
    };

    let format = effective_format(global.format, true);
    if print_structured_list(&rentals, format)? {
        return Ok(());
    }
    if rentals.is_empty() && format == OutputFormat::Table {
        print_no_results("rentals", "gear rent new <CODE> --customer <NAME>");
        return Ok(());
    }

    let rows: Vec<TableRow> = rentals
        .iter()
        .map(|r| rental_to_row(r, r.is_active().then(|| r.due_state(today))))
        .collect();
    let visible: &[&str] = if args.all {
        &["id", "equipment", "customer", "start", "due", "status"]
    } else {
        &["id", "equipment", "customer", "location", "start", "due"]
    };
    TableFormatter::new(RNT_COLUMNS, "rental(s)").output(&rows, format, visible)
}

fn rental_to_row(r: &Rental, state: Option<DueState>) -> TableRow {
    TableRow::new(r.id.clone())
        .cell("id", CellValue::Id(r.id.clone()))
        .cell("equipment", CellValue::Text(r.equipment_name.clone()))
        .cell("customer", CellValue::Text(r.customer_name.clone()))
        .cell("location", CellValue::Text(r.location.clone()))
        .cell("start", CellValue::Date(r.start_date))
        .cell("due", CellValue::Day(r.planned_return))
        .cell(
            "state",
            CellValue::Text(state.map(|s| s.to_string()).unwrap_or_default()),
        )
        .cell("status", CellValue::Text(r.status.to_string()))
}

/// Match `--customer` against customer records: exact name first, then a
/// `CUS-` id or id prefix
fn find_customer(store: &Store, reference: &str) -> Result<Option<Customer>> {
    let wanted = reference.trim().to_lowercase();
    let customers = store.load_all::<Customer>().into_diagnostic()?;
    if let Some(c) = customers
        .iter()
        .find(|c| c.name.trim().to_lowercase() == wanted)
    {
        return Ok(Some(c.clone()));
    }
    if !wanted.starts_with("cus-") {
        return Ok(None);
    }
    match store.find::<Customer>(reference) {
        Ok(c) => Ok(Some(c)),
        Err(StoreError::NotFound { .. }) => Ok(None),
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let eqp = resolve_equipment(&ctx.store, &args.equipment).into_diagnostic()?;

    let customer_arg = args.customer.trim();
    if customer_arg.is_empty() {
        return Err(miette::miette!("--customer cannot be empty"));
    }
    let customer = find_customer(&ctx.store, customer_arg)?;

    let mut req = match &customer {
        Some(c) => {
            let mut req = CheckoutRequest::new(eqp.id.clone(), c.name.clone());
            req.customer = Some(c.id.clone());
            req
        }
        None => CheckoutRequest::new(eqp.id.clone(), customer_arg),
    };
    req.location = args.location.unwrap_or_default();
    req.planned_return = args.until;
    req.notes = non_empty(args.notes);

    let rental = checkout(&ctx.store, &ctx.actor, req, Utc::now()).into_diagnostic()?;

    if print_structured(&rental, global.format)? {
        return Ok(());
    }
    println!(
        "{} Rented {} ({}) to {}",
        style("✓").green(),
        style(&rental.equipment_name).yellow(),
        style(&eqp.short_code).cyan(),
        style(&rental.customer_name).bold()
    );
    println!("   {}", style(&rental.id).cyan());
    if let Some(planned) = rental.planned_return {
        println!("   Due back: {}", planned);
    }
    if customer.is_none() {
        println!(
            "   {}",
            style("Customer not on file; add with 'gear cust new'").dim()
        );
    }
    Ok(())
}

fn run_return(args: ReturnArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let rental: Rental = ctx.store.find(&args.rental).into_diagnostic()?;

    let prompt = format!(
        "Return {} from {}?",
        rental.equipment_name, rental.customer_name
    );
    if !confirm(&prompt, args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let done = check_in(&ctx.store, &ctx.actor, &rental.id.to_string(), Utc::now())
        .into_diagnostic()?;

    if print_structured(&done, global.format)? {
        return Ok(());
    }
    println!(
        "{} Returned {} from {}",
        style("✓").green(),
        style(&done.equipment_name).yellow(),
        done.customer_name
    );
    if let Some(planned) = done.planned_return {
        let returned = done.actual_return.unwrap_or_else(Utc::now).date_naive();
        if returned > planned {
            println!(
                "   {} {} day(s) late",
                style("!").yellow(),
                (returned - planned).num_days()
            );
        }
    }
    Ok(())
}

fn run_due(global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let today = Utc::now().date_naive();
    let list = deliveries(&ctx.store, today).into_diagnostic()?;

    let format = effective_format(global.format, true);
    let rentals: Vec<&Rental> = list.iter().map(|(r, _)| r).collect();
    if print_structured_list(&rentals, format)? {
        return Ok(());
    }
    if list.is_empty() && format == OutputFormat::Table {
        println!("No active rentals.");
        return Ok(());
    }

    let rows: Vec<TableRow> = list
        .iter()
        .map(|(r, state)| rental_to_row(r, Some(*state)))
        .collect();
    TableFormatter::new(RNT_COLUMNS, "rental(s)").output(
        &rows,
        format,
        &["due", "state", "equipment", "customer", "location", "id"],
    )?;

    if format == OutputFormat::Table {
        let overdue = list
            .iter()
            .filter(|(_, s)| *s == DueState::Overdue)
            .count();
        if overdue > 0 {
            println!("{} {} overdue", style("!").red(), overdue);
        }
    }
    Ok(())
}
