//! `gear validate` command - Check record files against the embedded schemas

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::entity_cmd::rule;
use crate::core::lookup::ShortCodeIndex;
use crate::core::project::Project;
use crate::core::store::{Store, RECORD_SUFFIX};
use crate::core::EntityPrefix;
use crate::schema::registry::SchemaRegistry;
use crate::schema::validator::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to validate (default: entire project)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
    collisions: usize,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let registry = SchemaRegistry::default();
    let validator = Validator::new(&registry)?;

    let files = if args.paths.is_empty() {
        collect_records(project.root())
    } else {
        args.paths.iter().flat_map(|p| collect_records(p)).collect()
    };

    println!(
        "{} Validating {} file(s)...\n",
        style("→").blue(),
        files.len()
    );

    let mut stats = ValidationStats::default();
    for path in &files {
        stats.files_checked += 1;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(prefix) = EntityPrefix::from_filename(&filename) else {
            if !args.summary {
                println!(
                    "{} {} - unknown record type",
                    style("✗").red(),
                    path.display()
                );
            }
            stats.files_failed += 1;
            stats.total_errors += 1;
            continue;
        };

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if !args.summary {
                    println!("{} {} - {}", style("✗").red(), path.display(), e);
                }
                stats.files_failed += 1;
                stats.total_errors += 1;
                continue;
            }
        };

        match validator.validate(&content, &filename, prefix) {
            Ok(()) => {
                stats.files_passed += 1;
                if !args.summary {
                    println!("{} {}", style("✓").green(), path.display());
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                stats.total_errors += e.violation_count();
                if !args.summary {
                    println!(
                        "{} {} - {} error(s)",
                        style("✗").red(),
                        path.display(),
                        e.violation_count()
                    );
                    println!("{:?}", miette::Report::new(e));
                }
            }
        }
    }

    let index = ShortCodeIndex::load(&Store::new(&project)).into_diagnostic()?;
    for (code, ids) in index.collisions() {
        stats.collisions += 1;
        println!(
            "{} short code {} is shared by {} items:",
            style("!").yellow(),
            style(code).cyan(),
            ids.len()
        );
        for id in ids {
            println!("    {}", style(id).dim());
        }
    }

    println!();
    println!("{}", rule());
    println!("{}", style("Validation Summary").bold());
    println!("{}", rule());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    if stats.collisions > 0 {
        println!("  Code collisions: {}", style(stats.collisions).yellow());
    }
    println!();

    match stats.files_failed {
        0 => {
            println!("{} All files passed validation!", style("✓").green().bold());
            Ok(())
        }
        1 => Err(miette::miette!("Validation failed: 1 file has errors")),
        n => Err(miette::miette!("Validation failed: {} files have errors", n)),
    }
}

/// Record files under `path`, skipping dot directories; a file path is
/// returned as-is
fn collect_records(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.') || e.depth() == 0)
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(RECORD_SUFFIX))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}
