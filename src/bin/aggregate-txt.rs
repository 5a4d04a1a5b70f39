//! aggregate-txt CLI
//!
//! Write every file under a root directory to stdout as one text stream.

use aggregate_txt::{check_root, Aggregator, Config, Error, Locale};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "aggregate-txt")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Aggregate a directory tree into a single human-readable text stream")]
#[command(long_about = "Create a text stream containing all files from the root directory with \
their names, dates and hashes. Text files are included as is, binary files as a hex dump or \
base64. The result is human-readable and allows restoring the source tree.\n\n\
The stream is written to stdout unless --output is given.")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Directory to aggregate
    root: PathBuf,

    /// Dry run: only list directories and file classifications
    #[arg(short = 'd', long = "dry")]
    dry: bool,

    /// Use base64 for binary files instead of a hex dump
    #[arg(short = 'b', long)]
    base64: bool,

    /// Use Russian labels (same as --locale ru)
    #[arg(long)]
    ru: bool,

    /// Label locale: en or ru
    #[arg(long, env = "AGGREGATE_TXT_LOCALE", default_value = "en")]
    locale: Locale,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    follow_links: bool,

    /// Additional extension to always treat as text (repeatable)
    #[arg(short = 't', long = "text-ext", value_name = "EXT")]
    text_ext: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Verbose logging on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match aggregate(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Error>() {
                Some(Error::RootNotFound(path)) => {
                    eprintln!("Error: (root?) file not found: {}", path.display());
                }
                _ => tracing::error!("aggregation aborted: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aggregate_txt={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            root: self.root.clone(),
            dry_run: self.dry,
            use_base64: self.base64,
            locale: if self.ru { Locale::Russian } else { self.locale },
            follow_links: self.follow_links,
            extra_text_extensions: self.text_ext.clone(),
        }
    }
}

fn aggregate(cli: Cli) -> Result<()> {
    // Checked before the output file is created so a bad root leaves nothing behind
    check_root(&cli.root)?;

    let config = cli.config();
    tracing::debug!(?config, "starting");

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let aggregator = Aggregator::new(config);
    let session = aggregator.run(&mut writer)?;

    if let Some(path) = &cli.output {
        tracing::info!(
            output = %path.display(),
            files = session.files(),
            "archive written"
        );
    }

    Ok(())
}
