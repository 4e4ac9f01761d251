use scan_issues::config::{ConvertConfig, Format, OutputFormat};
use scan_issues::issue::Issue;
use scan_issues::report::{self, OutputMapper};
use scan_issues::{convert_oss_json_to_issues, convert_sarif_json_to_issues};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use std::{env, fs, io, path::PathBuf};

#[derive(Parser)]
#[command(version)]
/// scan-issues - normalize SARIF and dependency scan output into one issue list
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Options {
    #[arg(short, long, value_enum)]
    /// Input format, required unless set in the config file
    format: Option<Format>,
    #[arg(short, long)]
    /// Directory the scan ran in, defaults to the current directory
    work_dir: Option<PathBuf>,
    #[arg(long)]
    /// Keep suppressed and ignored findings
    include_ignores: bool,
    #[arg(short, long)]
    /// TOML file with default options
    config: Option<PathBuf>,
    /// Scanner output to read
    file: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Convert scanner output into issues
    Convert {
        #[command(flatten)]
        options: Options,
        #[arg(short, long, value_enum)]
        /// Output format, json unless set in the config file
        output: Option<OutputFormat>,
    },
    /// Wrap scanner output in a summary with issue count and issues
    Map {
        #[command(flatten)]
        options: Options,
        #[arg(long, default_value_t = false)]
        /// Mark the scan as failed in the summary
        failed: bool,
    },
}

/// Flat issue row for CSV output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueRow<'a> {
    id: &'a str,
    severity: String,
    title: &'a str,
    file_path: &'a str,
    line: Option<usize>,
    column: Option<usize>,
    package_name: &'a str,
    version: &'a str,
    is_ignored: bool,
    #[serde(rename = "fingerPrint")]
    fingerprint: &'a str,
    message: &'a str,
}

impl<'a> From<&'a Issue> for IssueRow<'a> {
    fn from(issue: &'a Issue) -> Self {
        IssueRow {
            id: &issue.id,
            severity: issue.severity.to_string(),
            title: &issue.title,
            file_path: &issue.file_path,
            line: issue.line,
            column: issue.column,
            package_name: &issue.package_name,
            version: &issue.version,
            is_ignored: issue.is_ignored,
            fingerprint: &issue.fingerprint,
            message: &issue.message,
        }
    }
}

struct Resolved {
    config: ConvertConfig,
    format: Format,
    work_dir: String,
    data: Vec<u8>,
}

fn resolve(options: Options, output: Option<OutputFormat>) -> Result<Resolved> {
    let from_file = match &options.config {
        Some(path) => ConvertConfig::from_file(path)?,
        None => ConvertConfig::default(),
    };
    let config = from_file.merge(ConvertConfig {
        work_dir: options.work_dir,
        include_ignores: options.include_ignores.then_some(true),
        format: options.format,
        output,
    });
    let format = config
        .format
        .ok_or_else(|| anyhow!("input format must be given with --format or in the config file"))?;
    let work_dir = match &config.work_dir {
        Some(work_dir) => work_dir.clone(),
        None => env::current_dir().context("could not determine the current directory")?,
    };
    let data = fs::read(&options.file)
        .with_context(|| format!("could not read {}", options.file.display()))?;
    Ok(Resolved {
        config,
        format,
        work_dir: work_dir.to_string_lossy().into_owned(),
        data,
    })
}

fn convert(resolved: &Resolved) -> Result<Vec<Issue>> {
    let include_ignores = resolved.config.include_ignores();
    let issues = match resolved.format {
        Format::Sarif => {
            let conversion =
                convert_sarif_json_to_issues(&resolved.data, &resolved.work_dir, include_ignores)?;
            if let Some(err) = conversion.joined_error() {
                warn!(skipped = err.0.len(), "some result locations could not be resolved");
            }
            conversion.issues
        }
        Format::Oss => {
            convert_oss_json_to_issues(&resolved.work_dir, &resolved.data, include_ignores)?
        }
    };
    Ok(issues)
}

fn write_csv(issues: &[Issue]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for issue in issues {
        writer.serialize(IssueRow::from(issue))?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scan_issues=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert { options, output } => {
            let resolved = resolve(options, output)?;
            let issues = convert(&resolved)?;
            match resolved.config.output() {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&issues)?),
                OutputFormat::Csv => write_csv(&issues)?,
            }
        }
        Command::Map { options, failed } => {
            let resolved = resolve(options, None)?;
            let output = String::from_utf8(resolved.data)
                .context("scanner output is not valid UTF-8")?;
            let mapper = match resolved.format {
                Format::Sarif => OutputMapper::Code,
                Format::Oss => OutputMapper::Sca,
            };
            println!(
                "{}",
                report::map_scan_response(
                    mapper,
                    &output,
                    !failed,
                    &resolved.work_dir,
                    resolved.config.include_ignores(),
                )
            );
        }
    }
    Ok(())
}
