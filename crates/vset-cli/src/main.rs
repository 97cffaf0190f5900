//! Volume Set Search CLI
//!
//! Command-line tool for finding the multi-volume sets that the component
//! ISBNs of an order spreadsheet belong to.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vset_core::{
    extract_components_with, is_valid_isbn13, load_sheet, search_with, Catalog, ScanLayout,
    SearchReport,
};

#[derive(Parser)]
#[command(name = "vset-cli")]
#[command(about = "Volume Sets Reverse Search", long_about = None)]
#[command(version)]
struct Cli {
    /// Log scan and match diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the volume sets for every component ISBN in a spreadsheet
    Search {
        /// Order spreadsheet (.xlsx, .xls, .xlsb, .ods or .csv)
        #[arg(short, long)]
        input: PathBuf,

        /// Volume set catalog (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Column layout file (JSON), defaults to the standard order export
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the component ISBNs and order numbers found in a spreadsheet
    Extract {
        /// Order spreadsheet (.xlsx, .xls, .xlsb, .ods or .csv)
        #[arg(short, long)]
        input: PathBuf,

        /// Column layout file (JSON)
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },

    /// Check ISBN-13 checksums
    Validate {
        /// Candidate ISBNs (hyphens and spaces are ignored)
        #[arg(required = true)]
        isbns: Vec<String>,
    },

    /// Show statistics for a volume set catalog
    Catalog {
        /// Volume set catalog (JSON)
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Create a column layout file with the default columns
    CreateLayout {
        /// Output path for the layout file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "vset_core=debug" } else { "warn" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(command: Commands) -> vset_core::Result<()> {
    match command {
        Commands::Search {
            input,
            catalog,
            layout,
            format,
            output,
        } => cmd_search(&input, &catalog, layout.as_deref(), format, output.as_deref()),
        Commands::Extract { input, layout } => cmd_extract(&input, layout.as_deref()),
        Commands::Validate { isbns } => cmd_validate(&isbns),
        Commands::Catalog { catalog } => cmd_catalog(&catalog),
        Commands::CreateLayout { output } => cmd_create_layout(&output),
    }
}

fn load_layout(path: Option<&Path>) -> vset_core::Result<ScanLayout> {
    match path {
        Some(p) => ScanLayout::load(p),
        None => Ok(ScanLayout::default()),
    }
}

fn cmd_search(
    input: &Path,
    catalog_path: &Path,
    layout: Option<&Path>,
    format: Format,
    output: Option<&Path>,
) -> vset_core::Result<()> {
    let layout = load_layout(layout)?;
    let catalog = Catalog::load(catalog_path)?;
    let sheet = load_sheet(input)?;

    let source = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let report = search_with(&sheet.rows, &catalog, &layout)?.with_source(source);

    if report.is_empty() {
        println!("No ISBN numbers found in the uploaded file.");
        return Ok(());
    }

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match format {
        Format::Text => write_text_report(&mut writer, &report)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    if let Some(path) = output {
        println!(
            "Wrote report for {} ISBNs to {}",
            report.summary.total,
            path.display()
        );
    }

    Ok(())
}

fn write_text_report(w: &mut dyn Write, report: &SearchReport<'_>) -> io::Result<()> {
    if let Some(source) = &report.source {
        writeln!(w, "File: {}", source)?;
    }
    writeln!(w, "Report Date: {}", report.generated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(w)?;
    writeln!(
        w,
        "Total ISBNs: {}  Found: {}  Not Found: {}",
        report.summary.total, report.summary.found, report.summary.not_found
    )?;

    for group in &report.groups.found {
        let count = group.matched_isbns.len();
        writeln!(w)?;
        writeln!(
            w,
            "Found {} component{} in set ({} volumes)",
            count,
            if count > 1 { "s" } else { "" },
            group.set.volume_count
        )?;
        if let Some(order) = &group.order_number {
            writeln!(w, "Order: {}", order)?;
        }
        writeln!(w, "Set Title: {}", group.set.set_title)?;
        writeln!(w, "Set ISBN: {}", group.set.set_isbn)?;
        for row in group.volume_rows() {
            let marker = if row.highlighted { "  <-- searched" } else { "" };
            writeln!(w, "  {}\t{}{}", row.isbn, row.title, marker)?;
        }
    }

    for group in &report.groups.not_found {
        writeln!(w)?;
        match &group.order_number {
            Some(order) => writeln!(w, "Not found ({}), Order: {}", group.isbns.len(), order)?,
            None => writeln!(w, "Not found ({})", group.isbns.len())?,
        }
        writeln!(w, "  {}", group.isbns.join(", "))?;
    }

    Ok(())
}

fn cmd_extract(input: &Path, layout: Option<&Path>) -> vset_core::Result<()> {
    let layout = load_layout(layout)?;
    let sheet = load_sheet(input)?;
    let components = extract_components_with(&sheet.rows, &layout);

    println!("File: {}", input.display());
    println!("Rows: {}", sheet.row_count());
    println!("Components: {}", components.len());
    println!();

    println!("ISBN\tOrder");
    println!("{}", "-".repeat(24));
    for component in &components {
        println!(
            "{}\t{}",
            component.isbn,
            component.order_number.as_deref().unwrap_or(vset_core::NO_ORDER)
        );
    }

    Ok(())
}

fn cmd_validate(isbns: &[String]) -> vset_core::Result<()> {
    for isbn in isbns {
        let status = if is_valid_isbn13(isbn) { "valid" } else { "invalid" };
        println!("{}\t{}", isbn, status);
    }

    Ok(())
}

fn cmd_catalog(path: &Path) -> vset_core::Result<()> {
    let catalog = Catalog::load(path)?;

    println!("Catalog: {}", path.display());
    println!("Sets: {}", catalog.len());
    println!("Component ISBNs: {}", catalog.volume_count());

    let untitled: usize = catalog
        .sets()
        .iter()
        .flat_map(|s| s.volume_titles.iter())
        .filter(|t| t.as_str() == vset_core::UNKNOWN_TITLE)
        .count();
    if untitled > 0 {
        println!("Volumes without title: {}", untitled);
    }

    Ok(())
}

fn cmd_create_layout(output: &Path) -> vset_core::Result<()> {
    ScanLayout::default().save(output)?;
    println!("Created layout file: {}", output.display());
    println!();
    println!("Edit the column indices (0-based) to match your export, then run:");
    println!(
        "  vset-cli search --input <sheet> --catalog <json> --layout {}",
        output.display()
    );

    Ok(())
}
