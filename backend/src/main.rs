//! Datasweeper CLI - Clean and convert CSV/Excel files
//!
//! # Commands
//!
//! ```bash
//! datasweeper convert a.csv b.xlsx --dedupe --fill-missing --to excel
//! datasweeper preview a.csv --rows 10
//! datasweeper serve                  # Start HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use datasweeper::api::logs::LOG_BROADCASTER;
use datasweeper::{
    preview_file, process_batch, FileJob, FileOutcome, Format, ProcessOptions,
    DEFAULT_PREVIEW_ROWS,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "datasweeper")]
#[command(about = "Clean and convert CSV and Excel files", long_about = None)]
struct Cli {
    /// Do not echo pipeline logs to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and convert files
    Convert {
        /// Input .csv / .xlsx files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Remove duplicate rows
        #[arg(long)]
        dedupe: bool,

        /// Fill missing numeric values with the column mean
        #[arg(long)]
        fill_missing: bool,

        /// Columns to keep, in order (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Output format: csv or excel
        #[arg(short, long, default_value = "csv")]
        to: Format,

        /// Directory for converted files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Show the first rows and column types of each file
    Preview {
        /// Input .csv / .xlsx files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of rows to show
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,

        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "DATASWEEPER_PORT", default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if cli.quiet {
        LOG_BROADCASTER.set_echo(false);
    }

    let result = match cli.command {
        Commands::Convert {
            files,
            dedupe,
            fill_missing,
            columns,
            to,
            out_dir,
        } => {
            let options = ProcessOptions {
                deduplicate: dedupe,
                fill_missing,
                columns,
                target: to,
            };
            cmd_convert(&files, &options, &out_dir)
        }

        Commands::Preview { files, rows, json } => cmd_preview(&files, rows, json),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Read every input. Unreadable files are reported and skipped.
fn read_jobs(files: &[PathBuf]) -> (Vec<FileJob>, usize) {
    let mut jobs = Vec::with_capacity(files.len());
    let mut unreadable = 0;

    for path in files {
        match fs::read(path) {
            Ok(bytes) => jobs.push(FileJob::new(display_name(path), bytes)),
            Err(e) => {
                eprintln!("❌ {}: {}", path.display(), e);
                unreadable += 1;
            }
        }
    }

    (jobs, unreadable)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_convert(
    files: &[PathBuf],
    options: &ProcessOptions,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (jobs, unreadable) = read_jobs(files);

    fs::create_dir_all(out_dir)?;
    let report = process_batch(&jobs, options);

    let mut failed = unreadable;
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Converted(file) => match file.write_to(out_dir) {
                Ok(path) => println!(
                    "✅ {} -> {} ({} rows, {} columns)",
                    file.source_name,
                    path.display(),
                    file.row_count,
                    file.column_count
                ),
                Err(e) => {
                    println!("❌ {}: could not write {}: {}", file.source_name, file.file_name, e);
                    failed += 1;
                }
            },
            FileOutcome::Failed { file_name, error } => {
                println!("❌ {}: {}", file_name, error);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, files.len()).into());
    }
    Ok(())
}

fn cmd_preview(files: &[PathBuf], rows: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (jobs, mut failed) = read_jobs(files);

    for job in &jobs {
        match preview_file(job, rows) {
            Ok(preview) if json => {
                let entry = serde_json::json!({ "fileName": job.file_name, "preview": preview });
                println!("{}", serde_json::to_string_pretty(&entry)?);
            }
            Ok(preview) => {
                println!("📄 {}", job.file_name);
                println!("{}\n", preview.render());
            }
            Err(e) => {
                eprintln!("❌ {}: {}", job.file_name, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files could not be previewed", failed, files.len()).into());
    }
    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    datasweeper::server::start_server(port).await
}
