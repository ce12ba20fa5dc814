//! `gear eqp` command - Equipment inventory

use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{
    output_new_entity, print_no_results, print_structured, print_structured_list, rule,
    run_edit_generic, Context,
};
use crate::cli::filters::EquipmentStatusFilter;
use crate::cli::helpers::{confirm, non_empty};
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup::{resolve_equipment, ShortCodeIndex};
use crate::core::project::Project;
use crate::core::shortcode::ShortCode;
use crate::core::store::Store;
use crate::core::Config;
use crate::entities::{Equipment, Rental};
use crate::schema::LabelRenderer;

#[derive(Subcommand, Debug)]
pub enum EqpCommands {
    /// List equipment with filtering
    List(ListArgs),

    /// Add a new equipment item
    New(NewArgs),

    /// Show an item by short code or id
    Show(ShowArgs),

    /// Preview the short code a name would get
    Code(CodeArgs),

    /// Print a scannable label
    Label(ShowArgs),

    /// Edit an item in your editor
    Edit(ShowArgs),

    /// Delete an item (admin only)
    Delete(DeleteArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Code,
    Name,
    Category,
    Status,
    Stock,
    Serial,
    Created,
}

impl ListColumn {
    fn key(&self) -> &'static str {
        match self {
            ListColumn::Id => "id",
            ListColumn::Code => "code",
            ListColumn::Name => "name",
            ListColumn::Category => "category",
            ListColumn::Status => "status",
            ListColumn::Stock => "stock",
            ListColumn::Serial => "serial",
            ListColumn::Created => "created",
        }
    }
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

const EQP_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("code", "CODE", 5),
    ColumnDef::new("name", "NAME", 32),
    ColumnDef::new("category", "CATEGORY", 14),
    ColumnDef::new("status", "STATUS", 10),
    ColumnDef::new("stock", "STOCK", 5),
    ColumnDef::new("serial", "SERIAL", 16),
    ColumnDef::new("created", "CREATED", 10),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: EquipmentStatusFilter,

    /// Filter by category (case-insensitive)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in name, short code and serial number
    #[arg(long)]
    pub search: Option<String>,

    /// Show only items with no stock left
    #[arg(long)]
    pub out_of_stock: bool,

    /// Columns to display
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Code,
        ListColumn::Name,
        ListColumn::Category,
        ListColumn::Status,
        ListColumn::Stock,
        ListColumn::Id,
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field
    #[arg(long, default_value = "name")]
    pub sort: ListColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit output to N items
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Item name (e.g., "Sony A7S III")
    #[arg(long)]
    pub name: Option<String>,

    /// Category (defaults to the configured default category)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Units owned
    #[arg(long, default_value_t = 1)]
    pub stock: u32,

    /// Manufacturer serial number
    #[arg(long)]
    pub serial: Option<String>,

    /// Photo URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Prompt for the fields
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Short code, id, or id fragment
    pub reference: String,
}

#[derive(clap::Args, Debug)]
pub struct CodeArgs {
    /// Equipment name
    pub name: String,

    /// Category (defaults to the configured default category)
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Short code, id, or id fragment
    pub reference: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: EqpCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        EqpCommands::List(args) => run_list(args, global),
        EqpCommands::New(args) => run_new(args, global),
        EqpCommands::Show(args) => run_show(args, global),
        EqpCommands::Code(args) => run_code(args, global),
        EqpCommands::Label(args) => run_label(args),
        EqpCommands::Edit(args) => run_edit(args),
        EqpCommands::Delete(args) => run_delete(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let search = args.search.as_deref().map(str::to_lowercase);

    let mut items: Vec<Equipment> = ctx
        .store
        .load_all::<Equipment>()
        .into_diagnostic()?
        .into_iter()
        .filter(|e| args.status.matches(e.status))
        .filter(|e| {
            args.category
                .as_deref()
                .is_none_or(|c| e.category.to_lowercase() == c.to_lowercase())
        })
        .filter(|e| !args.out_of_stock || e.is_out_of_stock())
        .filter(|e| {
            search.as_deref().is_none_or(|s| {
                e.name.to_lowercase().contains(s)
                    || e.short_code.as_str().to_lowercase().contains(s)
                    || e
                        .serial_number
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(s))
            })
        })
        .collect();

    match args.sort {
        ListColumn::Id => items.sort_by(|a, b| a.id.cmp(&b.id)),
        ListColumn::Code => items.sort_by(|a, b| a.short_code.cmp(&b.short_code)),
        ListColumn::Name => items.sort_by_key(|e| e.name.to_lowercase()),
        ListColumn::Category => items.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
        ListColumn::Status => items.sort_by(|a, b| a.status.cmp(&b.status)),
        ListColumn::Stock => items.sort_by(|a, b| a.stock.cmp(&b.stock)),
        ListColumn::Serial => items.sort_by(|a, b| a.serial_number.cmp(&b.serial_number)),
        ListColumn::Created => items.sort_by(|a, b| a.created.cmp(&b.created)),
    }

    if args.reverse {
        items.reverse();
    }
    if let Some(limit) = args.limit {
        items.truncate(limit);
    }

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    let format = effective_format(global.format, true);
    if print_structured_list(&items, format)? {
        return Ok(());
    }

    if items.is_empty() && format == OutputFormat::Table {
        print_no_results("equipment", "gear eqp new --name <NAME>");
        return Ok(());
    }

    let rows: Vec<TableRow> = items.iter().map(equipment_to_row).collect();
    let visible: Vec<&str> = args.columns.iter().map(ListColumn::key).collect();
    TableFormatter::new(EQP_COLUMNS, "item(s)").output(&rows, format, &visible)
}

fn equipment_to_row(e: &Equipment) -> TableRow {
    TableRow::new(e.id.clone())
        .cell("id", CellValue::Id(e.id.clone()))
        .cell("code", CellValue::Text(e.short_code.to_string()))
        .cell("name", CellValue::Text(e.name.clone()))
        .cell("category", CellValue::Text(e.category.clone()))
        .cell("status", CellValue::Text(e.status.to_string()))
        .cell("stock", CellValue::Number(e.stock))
        .cell(
            "serial",
            CellValue::Text(e.serial_number.clone().unwrap_or_default()),
        )
        .cell("created", CellValue::Date(e.created))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;

    let (name, category, stock) = if args.interactive {
        prompt_new(&ctx.config, &args)?
    } else {
        let name = non_empty(args.name.clone())
            .ok_or_else(|| miette::miette!("--name is required (or use -i)"))?;
        let category = non_empty(args.category.clone())
            .unwrap_or_else(|| ctx.config.default_category().to_string());
        (name, category, args.stock)
    };

    let known = ctx.config.categories();
    if !known.iter().any(|c| c.to_lowercase() == category.to_lowercase()) {
        eprintln!(
            "{} '{}' is not one of the configured categories ({})",
            style("!").yellow(),
            category,
            known.join(", ")
        );
    }

    let mut eqp = Equipment::new(name, category, ctx.actor.display()).with_stock(stock);
    eqp.serial_number = non_empty(args.serial);
    eqp.image_url = non_empty(args.image_url);
    eqp.notes = non_empty(args.notes);
    eqp.tags = args.tags;

    let index = ShortCodeIndex::load(&ctx.store).into_diagnostic()?;
    let shared = index.holders(&eqp.short_code).len();

    let path = ctx.store.create(&eqp).into_diagnostic()?;
    let info = format!("Short code: {}", style(&eqp.short_code).cyan().bold());
    output_new_entity(&eqp.id, &path, "equipment", &eqp.name, Some(&info), global);

    if shared > 0 {
        eprintln!(
            "{} Short code {} is also used by {} other item(s); scans pick the oldest, use the id for this one",
            style("!").yellow(),
            eqp.short_code,
            shared
        );
    }
    Ok(())
}

fn prompt_new(config: &Config, args: &NewArgs) -> Result<(String, String, u32)> {
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Name")
        .with_initial_text(args.name.clone().unwrap_or_default())
        .validate_with(|s: &String| {
            if s.trim().is_empty() {
                Err("name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .into_diagnostic()?;

    let categories = config.categories();
    let wanted = args
        .category
        .clone()
        .unwrap_or_else(|| config.default_category().to_string());
    let default_idx = categories.iter().position(|c| *c == wanted).unwrap_or(0);
    let idx = Select::with_theme(&theme)
        .with_prompt("Category")
        .items(&categories)
        .default(default_idx)
        .interact()
        .into_diagnostic()?;

    let stock: u32 = Input::with_theme(&theme)
        .with_prompt("Stock")
        .default(args.stock)
        .interact_text()
        .into_diagnostic()?;

    Ok((name.trim().to_string(), categories[idx].clone(), stock))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::discover()?;
    let eqp = resolve_equipment(&ctx.store, &args.reference).into_diagnostic()?;

    if print_structured(&eqp, global.format)? {
        return Ok(());
    }
    print_equipment(&ctx.store, &eqp)
}

/// Detail view used by `show` and `scan`
pub fn print_equipment(store: &Store, eqp: &Equipment) -> Result<()> {
    println!("{}", rule());
    println!("{}: {}", style("ID").bold(), style(&eqp.id).cyan());
    println!(
        "{}: {}",
        style("Code").bold(),
        style(&eqp.short_code).cyan().bold()
    );
    println!("{}: {}", style("Name").bold(), style(&eqp.name).yellow());
    println!("{}: {}", style("Category").bold(), eqp.category);
    let status = if eqp.is_rented() {
        style(eqp.status.to_string()).yellow()
    } else {
        style(eqp.status.to_string()).green()
    };
    println!("{}: {}", style("Status").bold(), status);
    let stock = if eqp.is_out_of_stock() {
        style(eqp.stock.to_string()).red()
    } else {
        style(eqp.stock.to_string()).white()
    };
    println!("{}: {}", style("Stock").bold(), stock);
    if let Some(ref serial) = eqp.serial_number {
        println!("{}: {}", style("Serial").bold(), serial);
    }
    println!("{}", rule());

    if let Some(ref rental_id) = eqp.current_rental {
        match store.get::<Rental>(rental_id) {
            Ok(rental) => {
                println!();
                println!("{}:", style("Current rental").bold());
                println!("  {} ({})", style(&rental.id).cyan(), rental.customer_name);
                if !rental.location.is_empty() {
                    println!("  Location: {}", rental.location);
                }
                if let Some(planned) = rental.planned_return {
                    println!("  Due back: {}", planned);
                }
            }
            Err(e) => {
                println!();
                println!("{} Current rental {}: {}", style("!").yellow(), rental_id, e);
            }
        }
    }

    if let Some(ref url) = eqp.image_url {
        println!();
        println!("{}: {}", style("Image").bold(), url);
    }
    if !eqp.tags.is_empty() {
        println!();
        println!("{}: {}", style("Tags").bold(), eqp.tags.join(", "));
    }
    if let Some(ref notes) = eqp.notes {
        println!();
        println!("{}", style("Notes:").bold());
        println!("{}", notes);
    }

    println!("{}", rule());
    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Author").dim(),
        eqp.author,
        style("Created").dim(),
        eqp.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        eqp.entity_revision
    );
    Ok(())
}

fn run_code(args: CodeArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().ok();
    let config = Config::load_for(project.as_ref());
    let category = non_empty(args.category).unwrap_or_else(|| config.default_category().to_string());
    let code = ShortCode::generate(&category, &args.name);

    if global.format == OutputFormat::Id {
        println!("{}", code);
        return Ok(());
    }

    println!("{}", style(&code).cyan().bold());
    if let Some(project) = project {
        let index = ShortCodeIndex::load(&Store::new(&project)).into_diagnostic()?;
        let holders = index.holders(&code);
        if !holders.is_empty() {
            println!(
                "{} already used by {} item(s):",
                style("!").yellow(),
                holders.len()
            );
            for id in holders {
                println!("  {}", id);
            }
        }
    }
    Ok(())
}

fn run_label(args: ShowArgs) -> Result<()> {
    let ctx = Context::discover()?;
    let eqp = resolve_equipment(&ctx.store, &args.reference).into_diagnostic()?;
    let renderer = LabelRenderer::new().into_diagnostic()?;
    print!("{}", renderer.render(&eqp).into_diagnostic()?);
    Ok(())
}

fn run_edit(args: ShowArgs) -> Result<()> {
    let ctx = Context::discover()?;
    let eqp = resolve_equipment(&ctx.store, &args.reference).into_diagnostic()?;
    run_edit_generic(&ctx, &eqp, |before: &Equipment, after: &Equipment| {
        if after.short_code != before.short_code {
            return Err(miette::miette!(
                help = "printed labels carry the code; create a new item if it must differ",
                "short code {} cannot be changed (tried {})",
                before.short_code,
                after.short_code
            ));
        }
        if after.status != before.status || after.current_rental != before.current_rental {
            return Err(miette::miette!(
                help = "use 'gear rent new' or 'gear rent return'",
                "rental status of {} cannot be changed by editing",
                before.name
            ));
        }
        Ok(())
    })
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let ctx = Context::discover()?;
    ctx.require_admin("deleting equipment")?;
    let eqp = resolve_equipment(&ctx.store, &args.reference).into_diagnostic()?;

    if eqp.is_rented() {
        eprintln!(
            "{} {} is currently on rental; its rental will be closed without it",
            style("!").yellow(),
            eqp.name
        );
    }

    let prompt = format!("Delete {} ({})?", eqp.name, eqp.short_code);
    if !confirm(&prompt, args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.store.delete::<Equipment>(&eqp.id).into_diagnostic()?;
    println!(
        "{} Deleted {} {}",
        style("✓").green(),
        eqp.name,
        style(&eqp.id).dim()
    );
    Ok(())
}
