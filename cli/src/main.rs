//! filemorph CLI - preview, clean and convert files

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use filemorph::batch::convert_upload;
use filemorph::render::to_json;
use filemorph::{
    convert_batch_parallel, legal_targets, ConversionRequest, Filemorph, FileOutcome, JsonFormat,
    OutputArtifact, Preview, SourceKind, TargetFormat, TransformOptions, Upload,
};

#[derive(Parser)]
#[command(name = "filemorph")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert between CSV, Excel, PDF, Word and image files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert files to another format
    Convert {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Target format
        #[arg(short, long, value_enum)]
        to: TargetArg,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Remove duplicate rows (tables only)
        #[arg(long)]
        dedupe: bool,

        /// Fill missing numeric cells with the column mean (tables only)
        #[arg(long)]
        fill_missing: bool,

        /// Keep only these columns, in this order (tables only)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Convert files in parallel
        #[arg(long)]
        parallel: bool,

        /// Fail on unreadable PDF pages instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Show what was extracted from a file
    Preview {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of table rows to show
        #[arg(long, default_value_t = filemorph::DEFAULT_PREVIEW_ROWS)]
        rows: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// List supported formats and conversions
    Formats,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    /// Comma-separated values
    Csv,
    /// Excel workbook
    #[value(alias = "excel")]
    Xlsx,
    /// PDF document
    Pdf,
    /// Word document
    #[value(alias = "docx")]
    Word,
    /// PNG image
    Png,
}

impl From<TargetArg> for TargetFormat {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Csv => TargetFormat::Csv,
            TargetArg::Xlsx => TargetFormat::Xlsx,
            TargetArg::Pdf => TargetFormat::Pdf,
            TargetArg::Word => TargetFormat::Word,
            TargetArg::Png => TargetFormat::Png,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            to,
            output,
            dedupe,
            fill_missing,
            columns,
            parallel,
            strict,
        }) => {
            let mut transforms = TransformOptions::new()
                .remove_duplicates(dedupe)
                .fill_missing_numeric(fill_missing);
            if let Some(columns) = columns {
                transforms = transforms.with_columns(columns);
            }
            cmd_convert(
                &inputs,
                to.into(),
                output.as_deref(),
                transforms,
                parallel,
                strict,
            )
        }
        Some(Commands::Preview {
            input,
            rows,
            json,
            compact,
        }) => cmd_preview(&input, rows, json, compact),
        Some(Commands::Formats) => {
            cmd_formats();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: filemorph <COMMAND>".yellow());
            println!("       filemorph --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    inputs: &[PathBuf],
    target: TargetFormat,
    output: Option<&Path>,
    transforms: TransformOptions,
    parallel: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    log::debug!(
        "Converting {} file(s) to {} into {}",
        inputs.len(),
        target,
        output_dir.display()
    );

    let mut request = ConversionRequest::new(target).with_transforms(transforms);
    if strict {
        request = request.with_extract_options(filemorph::ExtractOptions::new().strict());
    }

    let mut failed = 0;
    let mut uploads = Vec::with_capacity(inputs.len());
    for input in inputs {
        match Upload::from_path(input) {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                print_failure(&input.display().to_string(), &e.to_string());
                failed += 1;
            }
        }
    }

    let pb = ProgressBar::new(uploads.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let outcomes: Vec<FileOutcome> = if parallel {
        pb.set_message("Converting in parallel...");
        let outcomes = convert_batch_parallel(&uploads, &request);
        pb.set_position(outcomes.len() as u64);
        outcomes
    } else {
        uploads
            .iter()
            .map(|upload| {
                pb.set_message(upload.name.clone());
                let outcome = convert_upload(upload, &request);
                pb.inc(1);
                outcome
            })
            .collect()
    };
    pb.finish_and_clear();

    let mut written: Vec<PathBuf> = Vec::new();
    for outcome in outcomes {
        let artifact = match outcome.result {
            Ok(artifact) => artifact,
            Err(e) => {
                print_failure(&outcome.file_name, &e.to_string());
                failed += 1;
                continue;
            }
        };
        let path = unique_output_path(&output_dir, &artifact.filename, &written);
        match write_artifact(&path, &artifact) {
            Ok(()) => written.push(path),
            Err(e) => {
                print_failure(&outcome.file_name, &format!("cannot write {}: {}", path.display(), e));
                failed += 1;
            }
        }
    }

    if !written.is_empty() {
        println!("\n{}", "Output files:".green().bold());
        for (i, path) in written.iter().enumerate() {
            let branch = if i + 1 == written.len() { "└─" } else { "├─" };
            println!("  {} {}", branch.dimmed(), path.display());
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_preview(
    input: &Path,
    rows: usize,
    json: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = Filemorph::new().open_path(input)?;
    let preview = file.preview(rows);

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", to_json(&preview, format)?);
        return Ok(());
    }

    println!("{}", input.display().to_string().cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Type".bold(), file.kind());
    println!("{}: {}", "Content".bold(), preview.caption());

    match preview {
        Preview::Table {
            columns,
            column_types,
            rows,
            ..
        } => {
            let types: Vec<String> = column_types
                .iter()
                .map(|t| format!("{:?}", t).to_lowercase())
                .collect();
            println!();
            println!("{}", columns.join("\t").bold());
            println!("{}", types.join("\t").dimmed());
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                println!("{}", cells.join("\t"));
            }
        }
        Preview::Text { lines, .. } => {
            println!();
            for line in lines {
                println!("{}", line);
            }
        }
        Preview::Image { .. } => {}
    }

    let targets: Vec<String> = file.legal_targets().iter().map(|t| t.to_string()).collect();
    println!();
    println!("{}: {}", "Convert to".bold(), targets.join(", "));

    Ok(())
}

fn cmd_formats() {
    println!("{}", "Supported Conversions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for kind in SourceKind::ALL {
        let extensions: Vec<String> = kind.extensions().iter().map(|e| format!(".{}", e)).collect();
        let targets: Vec<String> = legal_targets(kind).iter().map(|t| t.to_string()).collect();
        println!(
            "{:<6} {:<8} {} {}",
            kind.to_string().bold(),
            extensions.join(" "),
            "→".dimmed(),
            targets.join(", ")
        );
    }

    println!();
    println!(
        "{}",
        "PDF and Word convert to CSV or Excel only when their text is tabular.".dimmed()
    );
}

fn cmd_version() {
    println!("{} {}", "filemorph".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("CSV, Excel, PDF, Word and image conversion tool");
    println!();
    println!("License: MIT");
}

/// Path for `filename` in `dir` that no earlier output of this run uses.
/// Repeats become `name (1).ext`, `name (2).ext`, ...
fn unique_output_path(dir: &Path, filename: &str, taken: &[PathBuf]) -> PathBuf {
    let candidate = dir.join(filename);
    if !taken.contains(&candidate) {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{}", ext)),
        _ => (filename, String::new()),
    };
    (1..)
        .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
        .find(|path| !taken.contains(path))
        .unwrap_or(candidate)
}

fn write_artifact(path: &Path, artifact: &OutputArtifact) -> std::io::Result<()> {
    fs::write(path, &artifact.bytes)
}

fn print_failure(name: &str, message: &str) {
    eprintln!("{} {}: {}", "Failed".red().bold(), name, message);
}
