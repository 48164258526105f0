// ABOUTME: CLI for normalizing and auditing blog post fragments in the JSON post store.
// ABOUTME: Subcommands: normalize (rewrite the store), audit (report only), fragment (one file or stdin).

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postkit_html::{
    NormalizeOptions, Normalizer, SrcCollapse, ARTICLE_IMAGE_CLASS, AUTHOR_INFO_CLASS,
};
use postkit_store::{audit_store, normalize_store, BatchConfig, BatchSummary, PostAudit};
use tracing_subscriber::EnvFilter;

/// Normalize blog post HTML fragments for the site's page template.
#[derive(Parser, Debug)]
#[command(name = "postkit")]
#[command(about = "Normalize and audit blog post fragments in the JSON post store", long_about = None)]
struct Args {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize every post body and rewrite the store.
    Normalize(NormalizeArgs),
    /// Report heading, style, paragraph, image and class issues per post.
    Audit(AuditArgs),
    /// Normalize a single fragment and print it.
    Fragment(FragmentArgs),
}

#[derive(clap::Args, Debug)]
struct NormalizeArgs {
    /// Path to the JSON post store.
    store: PathBuf,

    /// Write the result here instead of over the store.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Report what would change without writing.
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    normalize: NormalizeFlags,
}

#[derive(clap::Args, Debug)]
struct AuditArgs {
    /// Path to the JSON post store.
    store: PathBuf,

    /// Output the audit as JSON.
    #[arg(long = "json")]
    json_output: bool,

    #[command(flatten)]
    normalize: NormalizeFlags,
}

#[derive(clap::Args, Debug)]
struct FragmentArgs {
    /// HTML file to normalize. Use "-" or omit to read stdin.
    input: Option<String>,

    #[command(flatten)]
    normalize: NormalizeFlags,
}

#[derive(clap::Args, Debug)]
struct NormalizeFlags {
    /// Class every image must carry.
    #[arg(long, default_value = ARTICLE_IMAGE_CLASS)]
    image_class: String,

    /// Class marking author blocks to remove.
    #[arg(long, default_value = AUTHOR_INFO_CLASS)]
    author_class: String,

    /// Keep directories after a `/../` in image paths instead of only the file name.
    #[arg(long)]
    keep_image_dirs: bool,
}

impl NormalizeFlags {
    fn options(&self) -> NormalizeOptions {
        NormalizeOptions {
            image_class: self.image_class.clone(),
            author_class: self.author_class.clone(),
            src_collapse: if self.keep_image_dirs {
                SrcCollapse::Remainder
            } else {
                SrcCollapse::FileName
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Normalize(cmd) => run_normalize(cmd),
        Command::Audit(cmd) => run_audit(cmd),
        Command::Fragment(cmd) => run_fragment(cmd),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info,postkit=debug,postkit_html=debug,postkit_store=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_normalize(cmd: NormalizeArgs) -> Result<()> {
    let mut config = BatchConfig::new(&cmd.store)
        .dry_run(cmd.dry_run)
        .options(cmd.normalize.options());
    if let Some(output) = cmd.output {
        config = config.output_path(output);
    }
    tracing::debug!(?config, "starting normalization");

    let summary = normalize_store(&config)
        .with_context(|| format!("normalizing {}", cmd.store.display()))?;
    println!("{}", format_summary(&summary));
    Ok(())
}

fn run_audit(cmd: AuditArgs) -> Result<()> {
    let audits = audit_store(&cmd.store, &cmd.normalize.options())
        .with_context(|| format!("auditing {}", cmd.store.display()))?;

    if cmd.json_output {
        println!("{}", serde_json::to_string_pretty(&audits)?);
    } else {
        println!("{}", format_audit(&audits));
    }
    Ok(())
}

fn run_fragment(cmd: FragmentArgs) -> Result<()> {
    let html = read_input(cmd.input.as_deref())?;
    let normalizer = Normalizer::new(cmd.normalize.options());
    let result = normalizer.normalize(&html);
    tracing::debug!(report = ?result.report, "normalized fragment");
    println!("{}", result.html);
    Ok(())
}

fn read_input(target: Option<&str>) -> Result<String> {
    match target {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading fragment from stdin")?;
            Ok(buf)
        }
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading fragment from {}", path))
        }
    }
}

fn format_summary(summary: &BatchSummary) -> String {
    let mut lines: Vec<String> = summary
        .outcomes
        .iter()
        .filter(|o| o.report.changed)
        .map(|o| format!("changed: {} ({} edits)", o.label, o.report.edits()))
        .collect();

    lines.push(format!(
        "{} of {} posts normalized, {} changed, {} without content",
        summary.normalized, summary.total, summary.changed, summary.skipped
    ));
    match &summary.written {
        Some(path) => lines.push(format!("wrote {}", path.display())),
        None => lines.push("dry run: store not written".to_string()),
    }
    lines.join("\n")
}

fn format_audit(audits: &[PostAudit]) -> String {
    let mut lines = vec![format!("Found {} posts.", audits.len())];

    for entry in audits {
        let title = entry.title.as_deref().unwrap_or(&entry.label);
        let id = entry
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        lines.push(String::new());
        lines.push(format!("--- Post: {} (ID: {}) ---", title, id));

        let Some(audit) = &entry.audit else {
            lines.push("No content.".to_string());
            continue;
        };

        lines.push(format!("Headings structure: [{}]", audit.headings.join(", ")));
        if audit.styled_elements > 0 {
            lines.push(format!(
                "Found {} elements with inline styles.",
                audit.styled_elements
            ));
            for sample in &audit.style_samples {
                lines.push(format!("  - <{} style='{}'>", sample.tag, sample.style));
            }
        }
        if audit.empty_paragraphs > 0 {
            lines.push(format!("Found {} empty paragraphs.", audit.empty_paragraphs));
        }
        if !audit.image_sources.is_empty() {
            lines.push(format!("Found {} images.", audit.image_sources.len()));
            for src in &audit.image_sources {
                lines.push(format!("  - Src: {}", src.as_deref().unwrap_or("(none)")));
            }
        }
        if !audit.classes.is_empty() {
            let classes: Vec<&str> = audit.classes.iter().map(String::as_str).collect();
            lines.push(format!("Classes used: {}", classes.join(", ")));
        }
        lines.push(format!(
            "Status: {}",
            if audit.is_clean() {
                "clean"
            } else {
                "needs normalization"
            }
        ));
    }

    lines.join("\n")
}
