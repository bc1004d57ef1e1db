use cc_array_extract::converter;
use cc_array_extract::extractor::{ExtractMode, ScanPolicy};
use cc_array_extract::manifest;
use cc_array_extract::pack::PackFormat;
use cc_array_extract::utils::{self, ConvertOptions};

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "cc-array-extract",
    about = "Turn generated C array sources into .tflite models and .data samples",
    version
)]
struct Args {
    /// Defaults to `run`
    #[command(subcommand)]
    command: Option<Commands>,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Fail on unmatched lines that do not look like comments, declarations or braces
    #[arg(long, default_value_t = false, global = true)]
    strict: bool,
    /// Extract and report without writing any file
    #[arg(long, default_value_t = false, global = true)]
    dry_run: bool,
    /// Root that manifest source paths are relative to
    #[arg(long, default_value = manifest::DEFAULT_SOURCE_ROOT, global = true)]
    source_root: PathBuf,
    /// Directory manifest outputs are written to
    #[arg(long, default_value = manifest::DEFAULT_OUTPUT_DIR, global = true)]
    output_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every job of the built-in manifest, in order
    Run,
    /// Print the built-in manifest
    List,
    /// Convert a single source file
    Convert {
        /// C source file holding the array
        #[arg(long)]
        input: PathBuf,
        /// Binary file to write
        #[arg(long)]
        output: PathBuf,
        /// Literal format: hex, float or decimal
        #[arg(long)]
        mode: ExtractMode,
        /// struct-style pack format, e.g. B, <h, !f (defaults per mode)
        #[arg(long)]
        format: Option<PackFormat>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = ConvertOptions {
        dry_run: args.dry_run,
        policy: if args.strict {
            ScanPolicy::Strict
        } else {
            ScanPolicy::Lenient
        },
    };

    match args.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let jobs = manifest::builtin_jobs();
            info!(
                jobs = jobs.len(),
                source_root = %args.source_root.display(),
                output_dir = %args.output_dir.display(),
                strict = args.strict,
                dry_run = args.dry_run,
                "starting manifest run"
            );
            let reports =
                converter::run_jobs(&jobs, &args.source_root, &args.output_dir, options)?;
            utils::print_summary(&reports, &args.output_dir);
            info!(jobs = reports.len(), "manifest run completed");
        }
        Commands::List => {
            for job in manifest::builtin_jobs() {
                println!(
                    "{:<36} {:<8} {:<3} {}",
                    job.name,
                    job.mode.to_string(),
                    job.effective_format().to_string(),
                    args.source_root.join(&job.source).display()
                );
            }
        }
        Commands::Convert {
            input,
            output,
            mode,
            format,
        } => {
            let format = format.unwrap_or_else(|| mode.default_format());
            info!(?input, ?output, %mode, %format, "starting convert");
            let report = converter::convert(&input, &output, mode, format, options)?;
            let dir = report
                .destination
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default();
            utils::print_summary(std::slice::from_ref(&report), &dir);
        }
    }

    if args.dry_run {
        info!("dry-run completed; no files written");
    }

    Ok(())
}
