// CLI tool handler signatures mirror the command-line surface.
#![allow(
    clippy::too_many_lines,            // CLI main() is necessarily large
    clippy::needless_pass_by_value,    // clap requires owned values
    clippy::fn_params_excessive_bools, // CLI commands have many boolean flags
    clippy::must_use_candidate,        // CLI functions don't need must_use
)]

//! Pagesort CLI - manifest-driven PDF page reassembly
//!
//! A command-line interface for validating page-range manifests and
//! splicing source PDFs into date-ordered output documents.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pagesort_backend::{
    inspect_source, load_manifest, run_manifest, ManifestOptions, RunOptions, RunOutcome,
    SourceInfo,
};
use pagesort_core::{
    plan_order, validate, OnExisting, OnInvalid, PagesortError, RangeRecord, ValidationOptions,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Parse a manifest delimiter argument into a single byte.
///
/// Accepts a single ASCII character, or `\t` / `tab` for tab-separated
/// manifests.
fn parse_delimiter(s: &str) -> Result<u8, String> {
    if s == "\\t" || s.eq_ignore_ascii_case("tab") {
        return Ok(b'\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!(
            "delimiter must be a single ASCII character, got '{s}'"
        )),
    }
}

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if verbose output is requested
    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Configuration file structure for .pagesort.toml
///
/// Configuration files can be placed in:
/// - User home directory: ~/.pagesort.toml (user defaults)
/// - Project directory: ./.pagesort.toml (project defaults)
///
/// Precedence order (highest to lowest):
/// 1. Command-line arguments (--manifest, --source, etc.)
/// 2. Project config (./.pagesort.toml)
/// 3. User config (~/.pagesort.toml)
/// 4. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
struct Config {
    /// Default paths and policies for the run command
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<RunConfig>,

    /// Default manifest parsing settings
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<ManifestConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    /// Default manifest CSV path
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<PathBuf>,

    /// Default source PDF path
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<PathBuf>,

    /// Default output PDF path
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,

    /// Require coverage from page 1 through the source's last page
    #[serde(skip_serializing_if = "Option::is_none")]
    strict: Option<bool>,

    /// Reassemble even when the manifest fails validation
    #[serde(skip_serializing_if = "Option::is_none")]
    continue_on_invalid: Option<bool>,

    /// Overwrite an existing output file
    #[serde(skip_serializing_if = "Option::is_none")]
    force: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
struct ManifestConfig {
    /// First manifest line is a header
    #[serde(skip_serializing_if = "Option::is_none")]
    has_headers: Option<bool>,

    /// Column delimiter (single character)
    #[serde(skip_serializing_if = "Option::is_none")]
    delimiter: Option<String>,

    /// Explicit chrono date format for sort keys
    #[serde(skip_serializing_if = "Option::is_none")]
    date_format: Option<String>,
}

impl Config {
    /// Load configuration from file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            // TOML errors include line/column information, preserve it
            eprintln!(
                "{} Failed to parse config file: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!("{} {}", "Parse error:".yellow().bold(), e);
            eprintln!();
            eprintln!("{} Configuration file syntax:", "Help:".cyan().bold());
            eprintln!("  [run]");
            eprintln!("  manifest = \"manifest.csv\"");
            eprintln!("  source = \"scanned.pdf\"");
            eprintln!("  output = \"sorted.pdf\"");
            eprintln!();
            eprintln!("  [manifest]");
            eprintln!("  has_headers = true");
            eprintln!("  delimiter = \",\"");
            anyhow::anyhow!("Failed to parse config file: {e}")
        })?;

        Ok(config)
    }

    /// Find and load configuration files
    /// Returns (`user_config`, `project_config`)
    fn discover_configs() -> (Option<Self>, Option<Self>) {
        let user_config = Self::load_user_config();
        let project_config = Self::load_project_config();
        (user_config, project_config)
    }

    /// Load user config from ~/.pagesort.toml
    fn load_user_config() -> Option<Self> {
        let home_dir = dirs::home_dir()?;
        let config_path = home_dir.join(".pagesort.toml");

        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => Some(config),
                Err(e) => {
                    eprintln!(
                        "{} Failed to load user config from {}: {}",
                        "Warning:".yellow().bold(),
                        config_path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        }
    }

    /// Load project config from ./.pagesort.toml
    fn load_project_config() -> Option<Self> {
        let config_path = PathBuf::from(".pagesort.toml");

        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => Some(config),
                Err(e) => {
                    eprintln!(
                        "{} Failed to load project config from {}: {}",
                        "Warning:".yellow().bold(),
                        config_path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        }
    }

    /// Merge multiple configs with precedence
    /// CLI args > project config > user config > defaults
    fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = Self::default();

        // Apply user config first (lowest precedence)
        if let Some(user) = user_config {
            if let Some(run) = user.run {
                merged.run = Some(run);
            }
            if let Some(manifest) = user.manifest {
                merged.manifest = Some(manifest);
            }
        }

        // Apply project config (overrides user config field by field)
        if let Some(project) = project_config {
            if let Some(run) = project.run {
                let mut merged_run = merged.run.unwrap_or_default();
                if let Some(manifest) = run.manifest {
                    merged_run.manifest = Some(manifest);
                }
                if let Some(source) = run.source {
                    merged_run.source = Some(source);
                }
                if let Some(output) = run.output {
                    merged_run.output = Some(output);
                }
                if let Some(strict) = run.strict {
                    merged_run.strict = Some(strict);
                }
                if let Some(continue_on_invalid) = run.continue_on_invalid {
                    merged_run.continue_on_invalid = Some(continue_on_invalid);
                }
                if let Some(force) = run.force {
                    merged_run.force = Some(force);
                }
                merged.run = Some(merged_run);
            }

            if let Some(manifest) = project.manifest {
                let mut merged_manifest = merged.manifest.unwrap_or_default();
                if let Some(has_headers) = manifest.has_headers {
                    merged_manifest.has_headers = Some(has_headers);
                }
                if let Some(delimiter) = manifest.delimiter {
                    merged_manifest.delimiter = Some(delimiter);
                }
                if let Some(date_format) = manifest.date_format {
                    merged_manifest.date_format = Some(date_format);
                }
                merged.manifest = Some(merged_manifest);
            }
        }

        merged
    }

    fn run_defaults(&self) -> RunConfig {
        self.run.clone().unwrap_or_default()
    }

    fn manifest_defaults(&self) -> ManifestConfig {
        self.manifest.clone().unwrap_or_default()
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pagesort",
    about = "Reassemble PDF pages in manifest date order",
    long_about = "Validate page-range manifests and splice source PDFs into\n\
                  date-ordered output documents.\n\
                  \n\
                  A manifest is a CSV of date,page-from,page-to rows. Ranges are\n\
                  copied in ascending date order, with file order breaking ties.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reassemble a source PDF in manifest date order
    #[command(long_about = "Reassemble a source PDF in manifest date order.\n\
                      \n\
                      Loads the manifest, validates that its ranges tile the source\n\
                      without gaps or overlaps, then copies each range into the output\n\
                      in ascending date order.\n\
                      \n\
                      Examples:\n\
                        pagesort run -m manifest.csv -s scanned.pdf -o sorted.pdf\n\
                        pagesort run --force            # overwrite an existing output\n\
                        pagesort run --dry-run          # show the plan, write nothing\n\
                      \n\
                      Defaults can be set via .pagesort.toml configuration file.")]
    Run {
        /// Manifest CSV path (or [run] manifest from config)
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Source PDF path (or [run] source from config)
        #[arg(short, long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// Output PDF path (or [run] output from config)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Overwrite the output file if it already exists
        #[arg(long)]
        force: bool,

        /// Exit successfully without writing when the output already exists
        #[arg(long, conflicts_with = "force")]
        skip_existing: bool,

        /// Reassemble even when the manifest fails validation
        #[arg(long)]
        continue_on_invalid: bool,

        /// Also require coverage from page 1 through the source's last page
        #[arg(long)]
        strict: bool,

        /// Validate and print the planned copy order without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Treat the first manifest line as data rather than a header
        #[arg(long)]
        no_headers: bool,

        /// Manifest column delimiter (single character, or \t)
        #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Explicit chrono date format for manifest dates (e.g. %d.%m.%Y)
        #[arg(long, value_name = "FORMAT")]
        date_format: Option<String>,
    },

    /// Validate a manifest without writing anything
    #[command(long_about = "Validate a manifest without writing anything.\n\
                      \n\
                      Reports every violation, not just the first: backwards ranges\n\
                      and rows that do not start one page after their predecessor.\n\
                      \n\
                      Examples:\n\
                        pagesort check -m manifest.csv\n\
                        pagesort check -m manifest.csv --strict -s scanned.pdf\n\
                        pagesort check -m manifest.csv --json")]
    Check {
        /// Manifest CSV path (or [run] manifest from config)
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Source PDF; lets --strict also check coverage of the last page
        #[arg(short, long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// Require coverage from page 1 (and through the source's last page
        /// when a source is given)
        #[arg(long)]
        strict: bool,

        /// Output the validation report as JSON
        #[arg(long)]
        json: bool,

        /// Treat the first manifest line as data rather than a header
        #[arg(long)]
        no_headers: bool,

        /// Manifest column delimiter (single character, or \t)
        #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Explicit chrono date format for manifest dates
        #[arg(long, value_name = "FORMAT")]
        date_format: Option<String>,
    },

    /// Inspect a source PDF and manifest without writing
    #[command(long_about = "Inspect a source PDF and manifest without writing.\n\
                      \n\
                      Shows the source page count, PDF version, and document\n\
                      information, plus the manifest's range count, date span, and\n\
                      planned copy order when a manifest is given.\n\
                      \n\
                      Examples:\n\
                        pagesort info scanned.pdf\n\
                        pagesort info scanned.pdf -m manifest.csv\n\
                        pagesort info scanned.pdf --json")]
    Info {
        /// Source PDF to inspect (or [run] source from config)
        #[arg(value_name = "SOURCE")]
        source: Option<PathBuf>,

        /// Manifest to summarize alongside the source
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Treat the first manifest line as data rather than a header
        #[arg(long)]
        no_headers: bool,

        /// Manifest column delimiter (single character, or \t)
        #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Explicit chrono date format for manifest dates
        #[arg(long, value_name = "FORMAT")]
        date_format: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for pagesort.\n\
                      \n\
                      Supports bash, zsh, fish, and PowerShell.\n\
                      \n\
                      Examples:\n\
                        pagesort completion bash > /usr/local/etc/bash_completion.d/pagesort\n\
                        pagesort completion zsh > ~/.zsh/completions/_pagesort\n\
                        pagesort completion fish > ~/.config/fish/completions/pagesort.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Manage configuration settings
    #[command(long_about = "Manage pagesort configuration files and settings.\n\
                      \n\
                      Configuration files are loaded in this order (later overrides earlier):\n\
                        1. User config: ~/.pagesort.toml\n\
                        2. Project config: ./.pagesort.toml\n\
                        3. Command-line arguments\n\
                      \n\
                      Examples:\n\
                        pagesort config init         # Create .pagesort.toml with defaults\n\
                        pagesort config show         # Display current configuration\n\
                        pagesort config path --all   # Show config file locations")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Create a new .pagesort.toml configuration file with sensible defaults
    Init {
        /// Create in user home directory (~/.pagesort.toml) instead of current directory
        #[arg(long)]
        global: bool,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Display the current effective configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Show the path(s) to configuration file(s)
    Path {
        /// Show all config file paths (user and project)
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    // Load configuration files
    let (user_config, project_config) = Config::discover_configs();
    let config = Config::merge(user_config, project_config);

    let args = Args::parse();

    // Extract global verbosity settings
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    match args.command {
        Commands::Run {
            manifest,
            source,
            output,
            force,
            skip_existing,
            continue_on_invalid,
            strict,
            dry_run,
            no_headers,
            delimiter,
            date_format,
        } => run_command(
            manifest,
            source,
            output,
            force,
            skip_existing,
            continue_on_invalid,
            strict,
            dry_run,
            no_headers,
            delimiter,
            date_format,
            &config,
            verbosity,
        ),

        Commands::Check {
            manifest,
            source,
            strict,
            json,
            no_headers,
            delimiter,
            date_format,
        } => check_command(
            manifest,
            source,
            strict,
            json,
            no_headers,
            delimiter,
            date_format,
            &config,
            verbosity,
        ),

        Commands::Info {
            source,
            manifest,
            json,
            no_headers,
            delimiter,
            date_format,
        } => info_command(
            source,
            manifest,
            json,
            no_headers,
            delimiter,
            date_format,
            &config,
        ),

        Commands::Completion { shell } => completion_command(shell),
        Commands::Config { action } => config_command(action, verbosity),
    }
}

/// Resolve a required path from a CLI flag or config, exiting with a
/// hint when neither is present.
fn require_path(cli: Option<PathBuf>, config: Option<PathBuf>, what: &str, flag: &str) -> PathBuf {
    if let Some(path) = cli.or(config) {
        return path;
    }
    eprintln!("{} No {what} given", "Error:".red().bold());
    eprintln!(
        "{} Pass {flag}, or set it under [run] in .pagesort.toml",
        "Help:".cyan().bold()
    );
    std::process::exit(1);
}

/// Combine manifest parsing flags with config defaults. CLI flags win.
fn manifest_options(
    no_headers: bool,
    delimiter: Option<u8>,
    date_format: Option<String>,
    config: &ManifestConfig,
) -> ManifestOptions {
    let has_headers = if no_headers {
        false
    } else {
        config.has_headers.unwrap_or(true)
    };

    let delimiter = match (delimiter, config.delimiter.as_deref()) {
        (Some(d), _) => d,
        (None, Some(s)) => match parse_delimiter(s) {
            Ok(d) => d,
            Err(message) => {
                eprintln!(
                    "{} Invalid delimiter in config: {message}",
                    "Warning:".yellow().bold()
                );
                b','
            }
        },
        (None, None) => b',',
    };

    let mut options = ManifestOptions::new()
        .with_headers(has_headers)
        .with_delimiter(delimiter);
    if let Some(format) = date_format.or_else(|| config.date_format.clone()) {
        options = options.with_date_format(format);
    }
    options
}

#[allow(
    clippy::too_many_arguments,
    reason = "CLI command handler - args mirror CLI options"
)]
fn run_command(
    manifest: Option<PathBuf>,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    force: bool,
    skip_existing: bool,
    continue_on_invalid: bool,
    strict: bool,
    dry_run: bool,
    no_headers: bool,
    delimiter: Option<u8>,
    date_format: Option<String>,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let run_config = config.run_defaults();
    let manifest_config = config.manifest_defaults();

    let manifest_path = require_path(
        manifest,
        run_config.manifest.clone(),
        "manifest",
        "--manifest FILE",
    );
    let source_path = require_path(
        source,
        run_config.source.clone(),
        "source PDF",
        "--source FILE",
    );
    let output_path = require_path(
        output,
        run_config.output.clone(),
        "output path",
        "--output FILE",
    );

    let strict = strict || run_config.strict.unwrap_or(false);
    let options = RunOptions {
        on_invalid: if continue_on_invalid || run_config.continue_on_invalid.unwrap_or(false) {
            OnInvalid::Proceed
        } else {
            OnInvalid::Abort
        },
        // CLI flags first: --skip-existing must beat a config force = true
        on_existing: if force {
            OnExisting::Overwrite
        } else if skip_existing {
            OnExisting::Abort
        } else if run_config.force.unwrap_or(false) {
            OnExisting::Overwrite
        } else {
            OnExisting::Fail
        },
        require_first_page: strict,
        require_full_coverage: strict,
        manifest: manifest_options(no_headers, delimiter, date_format, &manifest_config),
    };

    if dry_run {
        return dry_run_command(&manifest_path, &source_path, &output_path, &options);
    }

    // Spinner while the whole pipeline runs (only if not quiet)
    let spinner = if verbosity.should_show_output() {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("template is compile-time constant")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        s.set_message(format!(
            "Reassembling {}...",
            source_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
        ));
        s.enable_steady_tick(std::time::Duration::from_millis(80));
        Some(s)
    } else {
        None
    };

    let start_time = std::time::Instant::now();
    let result = run_manifest(&manifest_path, &source_path, &output_path, &options);
    let elapsed = start_time.elapsed();

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match result {
        Ok(RunOutcome::Completed { report, summary }) => {
            // Findings the run proceeded past still deserve a mention
            for violation in report.violations() {
                eprintln!("{} {violation}", "Warning:".yellow().bold());
            }
            if verbosity.should_show_output() {
                eprintln!(
                    "{} Wrote {} page(s) from {} range(s) to: {}",
                    "✓".green().bold(),
                    summary.pages,
                    summary.ranges,
                    output_path.display().to_string().bright_white()
                );
            }
            if verbosity.is_verbose() {
                eprintln!(
                    "{} Reassembly completed in {:.2}s",
                    "Info:".blue().bold(),
                    elapsed.as_secs_f64()
                );
            }
            Ok(())
        }
        Ok(RunOutcome::SkippedExisting) => {
            if verbosity.should_show_output() {
                eprintln!(
                    "{} Output already exists, skipping: {}",
                    "Skipped:".yellow().bold(),
                    output_path.display()
                );
            }
            Ok(())
        }
        Err(PagesortError::InvalidManifest(report)) => {
            for violation in report.violations() {
                eprintln!("{} {violation}", "Error:".red().bold());
            }
            eprintln!(
                "{} Fix the manifest, or pass --continue-on-invalid to reassemble anyway",
                "Help:".cyan().bold()
            );
            std::process::exit(1);
        }
        Err(PagesortError::DestinationExists { path }) => {
            eprintln!(
                "{} Output file already exists: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!(
                "{} Use --force to overwrite, or --skip-existing to leave it",
                "Help:".cyan().bold()
            );
            std::process::exit(1);
        }
        Err(e) => Err(e).with_context(|| {
            format!(
                "Failed to reassemble {} into {}",
                source_path.display(),
                output_path.display()
            )
        }),
    }
}

/// Show what a run would copy, without touching the destination.
fn dry_run_command(
    manifest_path: &Path,
    source_path: &Path,
    output_path: &Path,
    options: &RunOptions,
) -> Result<()> {
    let records = load_manifest(manifest_path, &options.manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    let source = inspect_source(source_path)
        .with_context(|| format!("Failed to open source {}", source_path.display()))?;

    let mut validation =
        ValidationOptions::new().with_first_page_check(options.require_first_page);
    if options.require_full_coverage {
        validation = validation.with_expected_last_page(source.pages);
    }
    let report = validate(&records, &validation);
    for violation in report.violations() {
        eprintln!("{} {violation}", "Error:".red().bold());
    }

    let planned = plan_order(&records);
    let total: u64 = records.iter().map(RangeRecord::pages).sum();
    println!(
        "Would write {} page(s) from {} range(s) to {}",
        total,
        planned.len(),
        output_path.display()
    );
    for (position, record) in planned.iter().enumerate() {
        println!(
            "  {}. pages {}-{} dated {}",
            position + 1,
            record.page_from,
            record.page_to,
            record.sort_key
        );
    }

    if !report.is_valid() && options.on_invalid == OnInvalid::Abort {
        std::process::exit(1);
    }
    Ok(())
}

#[allow(
    clippy::too_many_arguments,
    reason = "CLI command handler - args mirror CLI options"
)]
fn check_command(
    manifest: Option<PathBuf>,
    source: Option<PathBuf>,
    strict: bool,
    json_output: bool,
    no_headers: bool,
    delimiter: Option<u8>,
    date_format: Option<String>,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let run_config = config.run_defaults();
    let manifest_config = config.manifest_defaults();

    let manifest_path = require_path(
        manifest,
        run_config.manifest.clone(),
        "manifest",
        "--manifest FILE",
    );
    let options = manifest_options(no_headers, delimiter, date_format, &manifest_config);

    let records = match load_manifest(&manifest_path, &options) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            std::process::exit(1);
        }
    };

    let strict = strict || run_config.strict.unwrap_or(false);
    let mut validation = ValidationOptions::new().with_first_page_check(strict);
    if strict {
        if let Some(source_path) = source.or_else(|| run_config.source.clone()) {
            let source = inspect_source(&source_path)
                .with_context(|| format!("Failed to open source {}", source_path.display()))?;
            validation = validation.with_expected_last_page(source.pages);
        }
    }

    let report = validate(&records, &validation);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !report.is_valid() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if report.is_valid() {
        if verbosity.should_show_output() {
            println!(
                "{} {} lists {} range(s), no violations",
                "Valid:".green().bold(),
                manifest_path.display(),
                records.len()
            );
        }
        Ok(())
    } else {
        for violation in report.violations() {
            eprintln!("{} {violation}", "Error:".red().bold());
        }
        eprintln!(
            "{} {} violation(s) in {}",
            "Invalid:".red().bold(),
            report.violations().len(),
            manifest_path.display()
        );
        std::process::exit(1);
    }
}

/// Everything the info command reports, serializable for --json.
#[derive(Debug, Serialize)]
struct InfoReport {
    source: SourceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<ManifestSummary>,
}

#[derive(Debug, Serialize)]
struct ManifestSummary {
    path: String,
    ranges: usize,
    pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_date: Option<NaiveDate>,
    plan: Vec<PlannedRange>,
}

#[derive(Debug, Serialize)]
struct PlannedRange {
    page_from: u32,
    page_to: u32,
    date: NaiveDate,
}

#[allow(
    clippy::too_many_arguments,
    reason = "CLI command handler - args mirror CLI options"
)]
fn info_command(
    source: Option<PathBuf>,
    manifest: Option<PathBuf>,
    json_output: bool,
    no_headers: bool,
    delimiter: Option<u8>,
    date_format: Option<String>,
    config: &Config,
) -> Result<()> {
    let run_config = config.run_defaults();
    let manifest_config = config.manifest_defaults();

    let source_path = require_path(source, run_config.source.clone(), "source PDF", "SOURCE");
    let source_info = match inspect_source(&source_path) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            std::process::exit(1);
        }
    };

    let manifest_summary = match manifest.or_else(|| run_config.manifest.clone()) {
        Some(path) => {
            let options = manifest_options(no_headers, delimiter, date_format, &manifest_config);
            let records = load_manifest(&path, &options)
                .with_context(|| format!("Failed to load manifest {}", path.display()))?;
            let planned = plan_order(&records);
            Some(ManifestSummary {
                path: path.display().to_string(),
                ranges: records.len(),
                pages: records.iter().map(RangeRecord::pages).sum(),
                first_date: planned.first().map(|record| record.sort_key),
                last_date: planned.last().map(|record| record.sort_key),
                plan: planned
                    .iter()
                    .map(|record| PlannedRange {
                        page_from: record.page_from,
                        page_to: record.page_to,
                        date: record.sort_key,
                    })
                    .collect(),
            })
        }
        None => None,
    };

    let info = InfoReport {
        source: source_info,
        manifest: manifest_summary,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", "Source:".cyan().bold(), source_path.display());
    println!("  Pages: {}", info.source.pages);
    println!("  PDF version: {}", info.source.version);
    if let Some(ref title) = info.source.title {
        println!("  Title: {title}");
    }
    if let Some(ref author) = info.source.author {
        println!("  Author: {author}");
    }
    if let Some(ref subject) = info.source.subject {
        println!("  Subject: {subject}");
    }

    if let Some(ref summary) = info.manifest {
        println!("{} {}", "Manifest:".cyan().bold(), summary.path);
        println!("  Ranges: {}", summary.ranges);
        println!("  Pages covered: {}", summary.pages);
        if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
            println!("  Dates: {first} to {last}");
        }
        println!("{}", "Plan:".cyan().bold());
        for (position, range) in summary.plan.iter().enumerate() {
            println!(
                "  {}. pages {}-{} dated {}",
                position + 1,
                range.page_from,
                range.page_to,
                range.date
            );
        }
    }

    Ok(())
}

/// Generate shell completion scripts
#[allow(
    clippy::unnecessary_wraps,
    reason = "consistent return type for CLI commands"
)]
fn completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

fn config_command(action: ConfigAction, verbosity: Verbosity) -> Result<()> {
    match action {
        ConfigAction::Init { global, force } => config_init(global, force, verbosity),
        ConfigAction::Show { json } => config_show(json),
        ConfigAction::Path { all } => config_path(all),
    }
}

/// Create a new configuration file with sensible defaults
fn config_init(global: bool, force: bool, verbosity: Verbosity) -> Result<()> {
    let config_path = if global {
        dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".pagesort.toml")
    } else {
        PathBuf::from(".pagesort.toml")
    };

    if config_path.exists() && !force {
        eprintln!(
            "{} Configuration file already exists: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        eprintln!("{} Use --force to overwrite", "Hint:".cyan().bold());
        std::process::exit(1);
    }

    let default_config = r#"# Pagesort Configuration File

# Default paths and policies for the run command
[run]
# Manifest CSV of date,page-from,page-to rows
# manifest = "manifest.csv"

# Source PDF to copy pages from
# source = "scanned.pdf"

# Output PDF to write
# output = "sorted.pdf"

# Require coverage from page 1 through the source's last page
# strict = false

# Reassemble even when the manifest fails validation
# continue_on_invalid = false

# Overwrite an existing output file
# force = false

# How manifest files are parsed
[manifest]
# First line is a header
# has_headers = true

# Column delimiter (single character)
# delimiter = ","

# Explicit chrono date format
# (default tries %Y-%m-%d, then %m/%d/%Y, then %m/%d/%y)
# date_format = "%Y-%m-%d"
"#;

    fs::write(&config_path, default_config)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    if verbosity.should_show_output() {
        println!(
            "{} Created configuration file: {}",
            "Success:".green().bold(),
            config_path.display()
        );
    }

    Ok(())
}

/// Display the current effective configuration
fn config_show(json_output: bool) -> Result<()> {
    let (user_config, project_config) = Config::discover_configs();
    let merged = Config::merge(user_config, project_config);

    if json_output {
        let json = serde_json::to_string_pretty(&merged)?;
        println!("{json}");
    } else {
        let toml = toml::to_string_pretty(&merged)?;
        println!("{toml}");
    }

    Ok(())
}

/// Show the path(s) to configuration file(s)
#[allow(
    clippy::unnecessary_wraps,
    reason = "consistent return type for CLI commands"
)]
fn config_path(all: bool) -> Result<()> {
    let home_config = dirs::home_dir().map(|h| h.join(".pagesort.toml"));
    let project_config = PathBuf::from(".pagesort.toml");

    if all {
        // Show all paths with existence status
        println!("{}", "Configuration file paths:".bold());
        println!();

        if let Some(ref home) = home_config {
            let status = if home.exists() {
                "exists".green()
            } else {
                "not found".yellow()
            };
            println!(
                "  {} {} ({})",
                "User:".bright_black(),
                home.display(),
                status
            );
        }

        let status = if project_config.exists() {
            "exists".green()
        } else {
            "not found".yellow()
        };
        println!(
            "  {} {} ({})",
            "Project:".bright_black(),
            project_config.display(),
            status
        );
    } else {
        // Show the effective config path (project if exists, else user, else default project)
        if project_config.exists() {
            println!("{}", project_config.display());
        } else if let Some(ref home) = home_config {
            if home.exists() {
                println!("{}", home.display());
            } else {
                println!("{}", project_config.display());
            }
        } else {
            println!("{}", project_config.display());
        }
    }

    Ok(())
}
