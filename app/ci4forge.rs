//! Command-line interface for ci4forge.
//!
//! Parses generated CodeIgniter 4 output into files, packs an existing project
//! back into a marker blob, or replays a scripted re-prompting session.

use ci4forge::output::{self, OutputFormat};
use ci4forge::{
    Action, DuplicatePolicy, FileRecord, ForgeBuilder, ForgeError, ForgeOptions,
    GenerationOutput, Session, load_blob, pack_directory, read_blob,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::exit;

/// ci4forge — generated CodeIgniter 4 output to files and trees
#[derive(Parser)]
#[command(name = "ci4forge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a generated blob (file, or `-` for stdin) into files
    Parse {
        #[arg(default_value = "-")]
        input: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Tree)]
        format: Format,
    },
    /// Pack a project directory into files (a marker blob by default)
    Pack {
        /// Root directory (default current dir)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Blob)]
        format: Format,

        /// Max depth (unlimited if not set)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Include hidden files
        #[arg(long)]
        hidden: bool,

        /// Follow symlinks
        #[arg(long)]
        follow_links: bool,

        /// Disable .gitignore handling
        #[arg(long)]
        no_gitignore: bool,
    },
    /// Apply a JSON array of session actions and print the final session
    Replay { script: PathBuf },
}

#[derive(Args)]
struct CommonArgs {
    /// JSON file with base options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore patterns (can be repeated)
    #[arg(short = 'I', long = "ignore", global = true)]
    ignore_patterns: Vec<String>,

    /// Strip leading and trailing slashes from paths before building the tree
    #[arg(long, global = true)]
    trim_slashes: bool,

    /// Let later files with the same path overwrite earlier ones
    #[arg(long, global = true)]
    last_wins: bool,

    /// Input size limit in bytes
    #[arg(long, global = true)]
    file_size_limit: Option<u64>,

    /// Pretty output (indented JSON)
    #[arg(short, long, global = true)]
    pretty: bool,

    /// Write to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Tree,
    Paths,
    Markdown,
    Text,
    Blob,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Tree => OutputFormat::Tree,
            Format::Paths => OutputFormat::Paths,
            Format::Markdown => OutputFormat::Markdown,
            Format::Text => OutputFormat::Text,
            Format::Blob => OutputFormat::Blob,
        }
    }
}

#[derive(Serialize)]
struct ReplaySummary<'a> {
    files: &'a [FileRecord],
    selected_path: Option<&'a str>,
    prompt: &'a str,
    history_len: usize,
    history_index: Option<usize>,
}

impl CommonArgs {
    fn base_options(&self) -> Result<ForgeOptions, ForgeError> {
        let base = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
                serde_json::from_str(&raw)?
            }
            None => ForgeOptions::default(),
        };
        let mut builder = ForgeBuilder::from_options(base);
        if !self.ignore_patterns.is_empty() {
            builder = builder.ignore_patterns(self.ignore_patterns.clone());
        }
        if self.trim_slashes {
            builder = builder.trim_slashes(true);
        }
        if self.last_wins {
            builder = builder.duplicate_policy(DuplicatePolicy::LastWins);
        }
        if self.file_size_limit.is_some() {
            builder = builder.file_size_limit(self.file_size_limit);
        }
        Ok(builder.build())
    }
}

fn io_error(path: &std::path::Path, source: io::Error) -> ForgeError {
    ForgeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(feature = "logging")]
fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ci4forge=info"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true),
        )
        .try_init();
}

fn main() {
    #[cfg(feature = "logging")]
    init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ForgeError> {
    let options = cli.common.base_options()?;
    let pretty = cli.common.pretty;
    let text = match cli.command {
        Command::Parse { input, format } => {
            let blob = if input == "-" {
                read_blob(io::stdin().lock(), "<stdin>", &options)?
            } else {
                load_blob(&input, &options)?
            };
            let files = GenerationOutput::Blob(blob).into_records(&options)?;
            output::format_records(&files, format.into(), &options, pretty)?
        }
        Command::Pack {
            root,
            format,
            max_depth,
            hidden,
            follow_links,
            no_gitignore,
        } => {
            let mut builder = ForgeBuilder::from_options(options)
                .root(root)
                .respect_gitignore(!no_gitignore)
                .include_hidden(hidden)
                .follow_links(follow_links);
            if let Some(depth) = max_depth {
                builder = builder.max_depth(depth);
            }
            let options = builder.build();
            let files = pack_directory(&options)?;
            output::format_records(&files, format.into(), &options, pretty)?
        }
        Command::Replay { script } => {
            let raw = fs::read_to_string(&script).map_err(|e| io_error(&script, e))?;
            let actions: Vec<Action> = serde_json::from_str(&raw)?;
            let session = Session::with_options(options).apply_all(actions)?;
            let summary = ReplaySummary {
                files: session.files(),
                selected_path: session.selected_path(),
                prompt: session.prompt(),
                history_len: session.history().len(),
                history_index: session.history_index(),
            };
            let mut json = if pretty {
                serde_json::to_string_pretty(&summary)?
            } else {
                serde_json::to_string(&summary)?
            };
            json.push('\n');
            json
        }
    };

    match &cli.common.output {
        Some(path) => fs::write(path, text).map_err(|e| io_error(path, e)),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}
