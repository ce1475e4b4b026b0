use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::path::PathBuf;
use treewright::{
    apply, load_from_path, load_workspace, DocumentStatus, FileWriter, RenamePrefix, RulePipeline,
    RunReport,
};

#[derive(Parser)]
#[command(name = "treewright")]
#[command(about = "Batch source transformation engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply rewrite rules to a workspace and write changed documents back
    Apply {
        /// Path to workspace root
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Rule pipeline config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Shorthand for a single rename rule: prefix to match
        #[arg(long, requires = "replacement")]
        prefix: Option<String>,

        /// Shorthand for a single rename rule: replacement prefix
        #[arg(long, requires = "prefix")]
        replacement: Option<String>,

        /// Dry run - compute changes without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Machine-readable JSON report
        #[arg(long)]
        json: bool,
    },

    /// Report which documents would change, without writing anything
    Check {
        /// Path to workspace root
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// Rule pipeline config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Shorthand for a single rename rule: prefix to match
        #[arg(long, requires = "replacement")]
        prefix: Option<String>,

        /// Shorthand for a single rename rule: replacement prefix
        #[arg(long, requires = "prefix")]
        replacement: Option<String>,

        /// Machine-readable JSON report
        #[arg(long)]
        json: bool,
    },

    /// List the rules a config file defines
    List {
        /// Rule pipeline config (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let clean = match cli.command {
        Commands::Apply {
            workspace,
            config,
            prefix,
            replacement,
            dry_run,
            diff,
            json,
        } => {
            let pipeline = build_pipeline(config, prefix, replacement)?;
            run(&workspace, &pipeline, dry_run, diff, json)?
        }

        Commands::Check {
            workspace,
            config,
            prefix,
            replacement,
            json,
        } => {
            let pipeline = build_pipeline(config, prefix, replacement)?;
            run(&workspace, &pipeline, true, false, json)?
        }

        Commands::List { config } => {
            cmd_list(&config)?;
            true
        }
    };

    if !clean {
        std::process::exit(1);
    }
    Ok(())
}

/// Build the rule pipeline from either a config file or the rename
/// shorthand flags.
fn build_pipeline(
    config: Option<PathBuf>,
    prefix: Option<String>,
    replacement: Option<String>,
) -> Result<RulePipeline> {
    if let Some(path) = config {
        if prefix.is_some() {
            anyhow::bail!("--config and --prefix/--replacement are mutually exclusive");
        }
        return Ok(load_from_path(path)?.pipeline());
    }

    if let (Some(prefix), Some(replacement)) = (prefix, replacement) {
        return Ok(RulePipeline::new().with_rule(RenamePrefix::new(prefix, replacement)));
    }

    anyhow::bail!(
        "{}\n{}\n  {}\n  {}",
        "No rules given.".red(),
        "Try one of:".bold(),
        "1. A config file: treewright apply --config rules.toml",
        "2. The rename shorthand: treewright apply --prefix Old --replacement New"
    )
}

fn run(
    workspace: &PathBuf,
    pipeline: &RulePipeline,
    dry_run: bool,
    diff: bool,
    json: bool,
) -> Result<bool> {
    let workspace = load_workspace(workspace)?;
    let (workspace, changes) = apply(workspace, pipeline);

    if diff && !json {
        for change in &changes.changes {
            print_diff(
                &change.id.to_string(),
                &change.original_text,
                &change.new_text,
            );
        }
    }

    let write_report = if dry_run {
        None
    } else {
        Some(FileWriter::new(workspace.root())?.write(&changes))
    };

    let report = RunReport::assemble(&workspace, &changes, write_report.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, dry_run);
    }

    Ok(report.is_clean())
}

fn print_report(report: &RunReport, dry_run: bool) {
    for doc in &report.documents {
        let label = match doc.status {
            DocumentStatus::Unchanged => "unchanged".dimmed(),
            DocumentStatus::Transformed if dry_run => "would change".yellow(),
            DocumentStatus::Transformed => "transformed".green(),
            DocumentStatus::TransformFailed => "transform failed".red(),
            DocumentStatus::WriteFailed => "write failed".red(),
        };
        match &doc.detail {
            Some(detail) => println!(
                "  {label:>16}  {}:{} ({detail})",
                doc.project,
                doc.path.display()
            ),
            None => println!("  {label:>16}  {}:{}", doc.project, doc.path.display()),
        }
    }

    let transformed = report.count(DocumentStatus::Transformed);
    let failed = report.count(DocumentStatus::TransformFailed)
        + report.count(DocumentStatus::WriteFailed);
    let summary = format!(
        "{} document(s), {} {}, {} failed",
        report.documents.len(),
        transformed,
        if dry_run { "would change" } else { "transformed" },
        failed
    );
    if failed > 0 {
        println!("{}", summary.red());
    } else {
        println!("{}", summary.bold());
    }
}

fn print_diff(header: &str, original: &str, new_text: &str) {
    println!("{}", format!("--- {header}").bold());
    let diff = TextDiff::from_lines(original, new_text);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => print!("{}", format!("-{change}").red()),
            ChangeTag::Insert => print!("{}", format!("+{change}").green()),
            ChangeTag::Equal => print!(" {change}"),
        }
    }
    println!();
}

fn cmd_list(config: &PathBuf) -> Result<()> {
    let config = load_from_path(config)?;

    if let Some(description) = &config.meta.description {
        println!("{}", description.bold());
    }
    for (index, rule) in config.pipeline().names().iter().enumerate() {
        println!("  {index}: {rule}");
    }
    Ok(())
}
