//! Shared entity command infrastructure

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::access::{require_admin, Actor};
use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::core::project::Project;
use crate::core::store::Store;
use crate::core::Config;
use crate::entities::Employee;
use crate::yaml::parse_yaml;

/// Everything a command needs to touch the project
pub struct Context {
    pub project: Project,
    pub store: Store,
    pub config: Config,
    pub actor: Actor,
}

impl Context {
    pub fn discover() -> Result<Self> {
        let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
        let store = Store::new(&project);
        let config = Config::load_for(Some(&project));
        let actor = Actor::from_config(&config);
        Ok(Self {
            project,
            store,
            config,
            actor,
        })
    }

    /// Fail unless the acting user is an admin
    pub fn require_admin(&self, action: &'static str) -> Result<()> {
        let employees = self.store.load_all::<Employee>().into_diagnostic()?;
        require_admin(&self.actor, &self.config, &employees, action).into_diagnostic()
    }
}

/// Print a single record as JSON or YAML
///
/// Returns `false` when the format asks for the human-readable view.
pub fn print_structured<T: Serialize + Entity>(record: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(record).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", record.id());
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Print a list as JSON or YAML; `false` for the other formats
pub fn print_structured_list<T: Serialize>(records: &[T], format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(records).into_diagnostic()?);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Confirmation line for a newly created record
pub fn output_new_entity(
    id: &EntityId,
    file_path: &Path,
    entity_name: &str,
    title: &str,
    extra_info: Option<&str>,
    global: &GlobalOpts,
) {
    match global.format {
        OutputFormat::Id => {
            println!("{}", id);
        }
        _ => {
            println!(
                "{} Created {} {}",
                style("✓").green(),
                entity_name,
                style(id).cyan()
            );
            println!("   {}", style(file_path.display()).dim());
            println!("   {}", style(title).yellow());
            if let Some(info) = extra_info {
                println!("   {}", info);
            }
        }
    }
}

/// Edit a record in the configured editor.
///
/// The editor works on a scratch copy. The result is parsed, checked by
/// `check` against the loaded record, and saved with `Store::update`, so the
/// revision guard applies and a rejected edit leaves the record untouched.
pub fn run_edit_generic<T, F>(ctx: &Context, original: &T, check: F) -> Result<()>
where
    T: Entity,
    F: Fn(&T, &T) -> Result<()>,
{
    let path = ctx.store.path_for(original.id());
    let content = fs::read_to_string(&path).into_diagnostic()?;

    let mut scratch = tempfile::Builder::new()
        .prefix(&format!("{}-", original.id()))
        .suffix(".yaml")
        .tempfile()
        .into_diagnostic()?;
    scratch.write_all(content.as_bytes()).into_diagnostic()?;
    scratch.flush().into_diagnostic()?;

    println!(
        "Opening {} in {}...",
        style(path.display()).cyan(),
        style(ctx.config.editor()).yellow()
    );
    ctx.config.run_editor(scratch.path()).into_diagnostic()?;

    let edited_content = fs::read_to_string(scratch.path()).into_diagnostic()?;
    if edited_content == content {
        println!("No changes made.");
        return Ok(());
    }

    let mut edited: T = parse_yaml(&edited_content, &path.display().to_string())?;
    if edited.id() != original.id() {
        return Err(miette::miette!(
            "the id of {} cannot be changed (edit left {} untouched)",
            original.id(),
            path.display()
        ));
    }
    check(original, &edited)?;

    edited.set_revision(original.revision());
    ctx.store.update(&mut edited).into_diagnostic()?;
    tracing::info!(id = %edited.id(), revision = edited.revision(), "edited record");
    println!(
        "{} Saved {} (revision {})",
        style("✓").green(),
        style(edited.title()).yellow(),
        edited.revision()
    );
    Ok(())
}

/// Print "No X found" with a hint
pub fn print_no_results(name_plural: &str, hint: &str) {
    println!("No {} found.", name_plural);
    println!();
    println!("Create one with: {}", style(hint).yellow());
}

/// Separator line for detail views
pub fn rule() -> console::StyledObject<String> {
    style("─".repeat(60)).dim()
}
