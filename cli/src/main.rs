//! docsplit CLI - composite document splitting tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docsplit::{
    split_bytes_with_options, DocumentBody, Package, PackageMetadata, SplitOptions, SplitOutcome,
};

mod table;

#[derive(Parser)]
#[command(name = "docsplit")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Split a composite DOCX into independent, renamed documents", long_about = None)]
struct Cli {
    /// Input composite document
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Naming table CSV (two columns: primary label, secondary label)
    #[arg(value_name = "TABLE")]
    table: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a composite document using a naming table
    Split {
        /// Input composite document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Naming table CSV (two columns: primary label, secondary label)
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Bundle the outputs into one ZIP archive instead
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,

        /// Split at nodes containing this marker text
        #[arg(long, value_name = "TEXT")]
        marker: Option<String>,

        /// Explicit per-part node counts, comma separated (e.g. "3,2,4")
        #[arg(long, value_name = "COUNTS", conflicts_with = "marker")]
        counts: Option<String>,

        /// Treat the first CSV row as data, not as a header
        #[arg(long)]
        no_header: bool,

        /// Fail the whole run when the document yields more parts than
        /// the table has rows
        #[arg(long)]
        strict_naming: bool,

        /// Disable parallel encoding
        #[arg(long)]
        sequential: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show package information
    Info {
        /// Input composite document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Split {
            input,
            table,
            output,
            zip,
            marker,
            counts,
            no_header,
            strict_naming,
            sequential,
            json,
        }) => cmd_split(
            &input,
            &table,
            output.as_deref(),
            zip.as_deref(),
            marker.as_deref(),
            counts.as_deref(),
            no_header,
            strict_naming,
            sequential,
            json,
        ),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: split if both inputs are provided
            if let (Some(input), Some(table)) = (cli.input, cli.table) {
                cmd_split(
                    &input, &table, None, None, None, None, false, false, false, false,
                )
            } else {
                println!("{}", "Usage: docsplit <FILE> <TABLE>".yellow());
                println!("       docsplit --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_split(
    input: &Path,
    table_path: &Path,
    output: Option<&Path>,
    zip: Option<&Path>,
    marker: Option<&str>,
    counts: Option<&str>,
    no_header: bool,
    strict_naming: bool,
    sequential: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_split", stem))
    });

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Reading naming table...");
    let table = table::load_naming_table(table_path, !no_header)?;
    if table.is_empty() {
        return Err("the naming table has no rows".into());
    }
    pb.inc(1);

    pb.set_message("Splitting document...");
    let mut options = SplitOptions::new().with_parallel(!sequential);
    if let Some(marker) = marker {
        options = options.with_marker(marker);
    } else if let Some(counts) = counts {
        options = options.with_counts(parse_counts(counts)?);
    }
    if strict_naming {
        options = options.strict_naming();
    }

    let bytes = fs::read(input)?;
    let outcome = split_bytes_with_options(&bytes, &table, &options)?;
    pb.inc(1);

    pb.set_message("Writing outputs...");
    if let Some(zip_path) = zip {
        let bundle = docsplit::bundle::write_bundle(&outcome.documents)?;
        fs::write(zip_path, bundle)?;
    } else {
        fs::create_dir_all(&output_dir)?;
        for document in &outcome.documents {
            fs::write(output_dir.join(&document.file_name), &document.bytes)?;
        }
    }
    pb.inc(1);
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else {
        print_summary(&outcome, zip, &output_dir);
    }

    Ok(())
}

fn print_summary(outcome: &SplitOutcome, zip: Option<&Path>, output_dir: &Path) {
    let destination = zip
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| output_dir.display().to_string());

    println!(
        "{} {} document(s) written to {}",
        "Done:".green().bold(),
        outcome.summary.succeeded,
        destination
    );

    if !outcome.summary.skipped.is_empty() {
        println!(
            "{} {} partition(s) skipped:",
            "Warning:".yellow().bold(),
            outcome.summary.skipped.len()
        );
        for skip in &outcome.summary.skipped {
            println!("  #{}: {}", skip.index, skip.reason);
        }
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let package = Package::from_path(input)?;
    let metadata = PackageMetadata::from_package(&package);
    let body = DocumentBody::parse(package.body_bytes())?;

    println!("{}", "Package".cyan().bold());
    println!("  Format:      .{}", package.extension());
    println!("  Parts:       {}", package.part_count());
    println!("  Body part:   {}", package.body_part());
    println!("  Body nodes:  {}", body.node_count());

    println!("{}", "Properties".cyan().bold());
    if let Some(title) = &metadata.title {
        println!("  Title:       {title}");
    }
    if let Some(creator) = &metadata.creator {
        println!("  Creator:     {creator}");
    }
    if let Some(created) = &metadata.created {
        println!("  Created:     {created}");
    }
    if let Some(modified) = &metadata.modified {
        println!("  Modified:    {modified}");
    }

    Ok(())
}

fn cmd_version() {
    println!("docsplit {}", env!("CARGO_PKG_VERSION"));
}

fn parse_counts(raw: &str) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid count '{}'", part.trim()).into())
        })
        .collect()
}
