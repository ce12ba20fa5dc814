//! `gear emp` command - Staff accounts

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{output_new_entity, print_no_results, print_structured_list, Context};
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{Employee, Role};

#[derive(Subcommand, Debug)]
pub enum EmpCommands {
    /// List employees (admin only)
    List,

    /// Add an employee
    ///
    /// Needs admin rights once any admin exists.
    New(NewArgs),
}

const EMP_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("email", "EMAIL", 32),
    ColumnDef::new("role", "ROLE", 6),
];

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Login email, unique per employee
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Grant admin rights
    #[arg(long)]
    pub admin: bool,
}

pub fn run(cmd: EmpCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        EmpCommands::List => run_list(global),
        EmpCommands::New(args) => run_new(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    ctx.require_admin("listing employees")?;

    let mut employees = ctx.store.load_all::<Employee>().into_diagnostic()?;
    employees.sort_by_key(|e| e.email.to_lowercase());

    let format = effective_format(global.format, true);
    if print_structured_list(&employees, format)? {
        return Ok(());
    }
    if employees.is_empty() && format == OutputFormat::Table {
        print_no_results("employees", "gear emp new --email <EMAIL>");
        return Ok(());
    }

    let rows: Vec<TableRow> = employees
        .iter()
        .map(|e| {
            TableRow::new(e.id.clone())
                .cell("id", CellValue::Id(e.id.clone()))
                .cell("name", CellValue::Text(e.name.clone()))
                .cell("email", CellValue::Text(e.email.clone()))
                .cell("role", CellValue::Text(e.role.to_string()))
        })
        .collect();
    TableFormatter::new(EMP_COLUMNS, "employee(s)").output(&rows, format, &[])
}

/// Any admin on record, from config or employee roles
fn has_any_admin(ctx: &Context, employees: &[Employee]) -> bool {
    !ctx.config.admins.is_empty() || employees.iter().any(Employee::is_admin)
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(' '),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(miette::miette!("'{}' is not a valid email address", email))
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let email = args.email.trim().to_lowercase();
    validate_email(&email)?;

    let employees = ctx.store.load_all::<Employee>().into_diagnostic()?;
    if has_any_admin(&ctx, &employees) {
        ctx.require_admin("adding employees")?;
    } else {
        tracing::info!(email = %email, "no admin on record, allowing bootstrap");
    }

    if let Some(existing) = employees.iter().find(|e| e.has_email(&email)) {
        return Err(miette::miette!(
            "An employee with email {} already exists ({})",
            email,
            existing.id
        ));
    }

    let role = if args.admin { Role::Admin } else { Role::Staff };
    let employee = Employee::new(
        args.name.unwrap_or_default().trim(),
        email,
        role,
        ctx.actor.display(),
    );
    let path = ctx.store.create(&employee).into_diagnostic()?;

    let role_info = format!("Role: {}", style(role).cyan());
    output_new_entity(
        &employee.id,
        &path,
        "employee",
        employee.display_name(),
        Some(&role_info),
        global,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("deniz@example.com").is_ok());
        assert!(validate_email("deniz@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("deniz example.com").is_err());
        assert!(validate_email("de niz@example.com").is_err());
    }
}
