mod config;
mod output;

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use csdl_reader::{MetadataDocument, ReaderOptions, load_from_xml_with};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ConvertConfig;
use crate::output::{OutputFormat, format_document};

const STDIN_INPUT: &str = "-";

/// Verbosity of diagnostics written to stderr.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "csdl2json", version)]
#[command(about = "Convert OData CSDL XML metadata to CSDL-JSON")]
struct Cli {
    /// Diagnostic log level.
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert CSDL XML files to CSDL-JSON (or YAML).
    Convert(ConvertArgs),
    /// Translate CSDL XML files and report which ones fail.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// CSDL XML files to convert; `-` reads standard input.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Directory for converted files. Required for more than one input.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format (default: json).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Write JSON without indentation.
    #[arg(long)]
    compact: bool,
    /// Value for `$ApiRoot`.
    #[arg(long)]
    api_root: Option<String>,
    /// YAML configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of parallel conversion jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

impl ConvertArgs {
    fn resolve_config(&self) -> Result<ConvertConfig, String> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)
                .map_err(|e| format!("failed to load config {}: {e}", path.display()))?,
            None => ConvertConfig::default(),
        };
        if let Some(api_root) = &self.api_root {
            config.api_root.clone_from(api_root);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.compact {
            config.pretty = false;
        }
        if self.jobs.is_some() {
            config.jobs = self.jobs;
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// CSDL XML files to check; `-` reads standard input.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), String> {
    let config = args.resolve_config()?;
    let options = ReaderOptions::default().with_api_root(config.api_root.clone());
    debug!(config = ?config, "Resolved conversion settings");

    let Some(output_dir) = &args.output else {
        let [input] = args.inputs.as_slice() else {
            return Err("converting more than one input requires --output".to_string());
        };
        let document = read_input(input, &options)?;
        print!("{}", format_document(&document, config.format, config.pretty)?);
        return Ok(());
    };

    check_distinct_outputs(&args.inputs)?;
    fs::create_dir_all(output_dir)
        .map_err(|e| format!("failed to create {}: {e}", output_dir.display()))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.unwrap_or(0))
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let outcomes: Vec<(&PathBuf, Result<PathBuf, String>)> = pool.install(|| {
        args.inputs
            .par_iter()
            .map(|input| (input, convert_to_file(input, output_dir, &options, &config)))
            .collect()
    });

    let failures: Vec<_> = outcomes
        .iter()
        .filter_map(|(input, outcome)| outcome.as_ref().err().map(|err| (input, err)))
        .collect();
    for (input, outcome) in &outcomes {
        if let Ok(path) = outcome {
            info!(input = %input.display(), output = %path.display(), "Converted");
        }
    }

    eprintln!(
        "Converted {} of {} input(s) into {}",
        outcomes.len() - failures.len(),
        outcomes.len(),
        output_dir.display()
    );
    if failures.is_empty() {
        return Ok(());
    }

    eprintln!("\nFailures:");
    for (input, err) in &failures {
        eprintln!("  {}: {err}", input.display());
    }
    Err(format!("{} input(s) failed to convert", failures.len()))
}

fn convert_to_file(
    input: &Path,
    output_dir: &Path,
    options: &ReaderOptions,
    config: &ConvertConfig,
) -> Result<PathBuf, String> {
    let document = read_input(input, options)?;
    let rendered = format_document(&document, config.format, config.pretty)?;
    let path = output_dir.join(format!("{}.{}", output_stem(input), config.format.extension()));
    fs::write(&path, rendered).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(path)
}

/// Rejects batches where two inputs would write the same output file.
fn check_distinct_outputs(inputs: &[PathBuf]) -> Result<(), String> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    for input in inputs {
        if let Some(first) = seen.insert(output_stem(input), input) {
            return Err(format!(
                "{} and {} would both be written as '{}'",
                first.display(),
                input.display(),
                output_stem(input)
            ));
        }
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let options = ReaderOptions::default();
    let mut failed = 0;
    for input in &args.inputs {
        match read_input(input, &options) {
            Ok(_) => println!("{}: ok", input.display()),
            Err(err) => {
                failed += 1;
                println!("{}: FAILED: {err}", input.display());
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} input(s) failed", args.inputs.len()));
    }
    Ok(())
}

/// Reads and translates one input file (or standard input for `-`).
fn read_input(input: &Path, options: &ReaderOptions) -> Result<MetadataDocument, String> {
    let xml = if input.as_os_str() == STDIN_INPUT {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        buf
    } else {
        fs::read_to_string(input).map_err(|e| format!("failed to read {}: {e}", input.display()))?
    };
    load_from_xml_with(&xml, options).map_err(|e| e.to_string())
}

/// Output file stem for an input path; standard input becomes `stdin`.
fn output_stem(input: &Path) -> String {
    if input.as_os_str() == STDIN_INPUT {
        return "stdin".to_string();
    }
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem(Path::new("metadata/demo.xml")), "demo");
        assert_eq!(output_stem(Path::new("-")), "stdin");
        assert_eq!(output_stem(Path::new("service.edmx")), "service");
    }

    #[test]
    fn test_flags_override_config_defaults() {
        let cli = Cli::parse_from([
            "csdl2json",
            "convert",
            "a.xml",
            "--format",
            "yaml",
            "--compact",
            "--api-root",
            "https://host/",
            "--jobs",
            "2",
        ]);
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        let config = args.resolve_config().unwrap();
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(!config.pretty);
        assert_eq!(config.api_root, "https://host/");
        assert_eq!(config.jobs, Some(2));
    }

    #[test]
    fn test_zero_jobs_flag_is_rejected() {
        let cli = Cli::parse_from(["csdl2json", "convert", "a.xml", "--jobs", "0"]);
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        let err = args.resolve_config().unwrap_err();
        assert_eq!(err, "invalid config: jobs must be at least 1");
    }

    #[test]
    fn test_duplicate_output_stems_are_rejected() {
        let inputs = [PathBuf::from("a/demo.xml"), PathBuf::from("b/demo.xml")];
        let err = check_distinct_outputs(&inputs).unwrap_err();
        assert!(err.contains("would both be written as 'demo'"), "{err}");

        let distinct = [PathBuf::from("a/demo.xml"), PathBuf::from("a/other.xml")];
        assert!(check_distinct_outputs(&distinct).is_ok());
    }
}
