//! `repopack` binary entrypoint.

mod commands;
mod error;
mod format;
mod tracing_setup;

use clap::{Args, Parser, Subcommand};
use commands::{run_config_schema, run_config_show, run_pack, run_patterns};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use repopack_infra::PackRequest;
use repopack_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_setup::{Verbosity, init_subscriber};

#[derive(Debug, Parser)]
#[command(
    name = "repopack",
    version,
    about = "Pack a repository into a single text file",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pack the repository's text files into one document.
    Pack {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        overrides: PackOverrideArgs,
    },
    /// List the effective ignore patterns, grouped by source.
    Patterns {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        ignore: IgnoreOverrideArgs,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective config after file, overrides, and env merging.
    Show {
        #[command(flatten)]
        target: TargetArgs,
        /// Partial config JSON applied over the file config.
        #[arg(long)]
        overrides_json: Option<String>,
    },
    /// Print the JSON Schema of the config file.
    Schema,
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Repository root (defaults to current directory).
    root: Option<PathBuf>,
    /// Config file (JSON or TOML). Defaults to `repopack.config.json` under the root.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PackOverrideArgs {
    /// Output file path, relative to the root unless absolute.
    #[arg(long)]
    output_file: Option<String>,
    /// Text placed in the document header.
    #[arg(long)]
    header_text: Option<String>,
    /// Prefix each line with its 1-based number.
    #[arg(long)]
    show_line_numbers: bool,
    /// Drop whitespace-only lines.
    #[arg(long)]
    remove_empty_lines: bool,
    /// Number of largest files listed in the summary.
    #[arg(long)]
    top_files_len: Option<u32>,
    #[command(flatten)]
    ignore: IgnoreOverrideArgs,
}

#[derive(Debug, Args)]
struct IgnoreOverrideArgs {
    /// Additional ignore patterns (comma separated).
    #[arg(short, long, value_delimiter = ',')]
    ignore: Vec<String>,
    /// Do not read the root `.gitignore`.
    #[arg(long)]
    no_gitignore: bool,
    /// Do not prepend the built-in ignore catalog.
    #[arg(long)]
    no_default_patterns: bool,
}

impl IgnoreOverrideArgs {
    fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        if !self.ignore.is_empty() {
            map.insert("customPatterns".to_owned(), self.ignore.clone().into());
        }
        if self.no_gitignore {
            map.insert("useGitignore".to_owned(), false.into());
        }
        if self.no_default_patterns {
            map.insert("useDefaultPatterns".to_owned(), false.into());
        }
        map
    }
}

impl PackOverrideArgs {
    fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        if let Some(path) = self.output_file.as_ref() {
            map.insert("filePath".to_owned(), path.clone().into());
        }
        if let Some(text) = self.header_text.as_ref() {
            map.insert("headerText".to_owned(), text.clone().into());
        }
        if self.show_line_numbers {
            map.insert("showLineNumbers".to_owned(), true.into());
        }
        if self.remove_empty_lines {
            map.insert("removeEmptyLines".to_owned(), true.into());
        }
        if let Some(length) = self.top_files_len {
            map.insert("topFilesLength".to_owned(), length.into());
        }
        map
    }
}

/// Rendered command result, written by `main`.
pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_subscriber(Verbosity::from_flags(cli.output.verbose, cli.output.quiet));
    let mode = OutputMode::from_args(&cli.output);
    let env = collect_scoped_env("REPOPACK_");

    match run(&cli.command, mode, &env) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(
    command: &Commands,
    mode: OutputMode,
    env: &BTreeMap<String, String>,
) -> Result<CliOutput, CliError> {
    tracing::debug!(?command, "dispatching command");
    match command {
        Commands::Pack { target, overrides } => {
            let overrides_json = build_overrides_json(overrides.to_map(), overrides.ignore.to_map())?;
            run_pack(mode, env, &pack_request(target, overrides_json)?)
        },
        Commands::Patterns { target, ignore } => {
            let overrides_json = build_overrides_json(serde_json::Map::new(), ignore.to_map())?;
            run_patterns(mode, env, &pack_request(target, overrides_json)?)
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show {
                target,
                overrides_json,
            } => run_config_show(mode, env, &pack_request(target, overrides_json.clone())?),
            ConfigCommands::Schema => run_config_schema(mode),
        },
    }
}

fn pack_request(target: &TargetArgs, overrides_json: Option<String>) -> Result<PackRequest, CliError> {
    let root = match target.root.as_ref() {
        Some(root) if root.as_os_str().is_empty() => {
            return Err(CliError::InvalidInput("repository root cannot be empty".to_owned()));
        },
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    Ok(PackRequest {
        root,
        config_path: target.config.clone(),
        overrides_json,
    })
}

fn build_overrides_json(
    output_map: serde_json::Map<String, serde_json::Value>,
    ignore_map: serde_json::Map<String, serde_json::Value>,
) -> Result<Option<String>, CliError> {
    if output_map.is_empty() && ignore_map.is_empty() {
        return Ok(None);
    }

    let mut root = serde_json::Map::new();
    if !output_map.is_empty() {
        root.insert("output".to_owned(), serde_json::Value::Object(output_map));
    }
    if !ignore_map.is_empty() {
        root.insert("ignore".to_owned(), serde_json::Value::Object(ignore_map));
    }
    Ok(Some(serde_json::to_string(&serde_json::Value::Object(root))?))
}

pub(crate) fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        let payload = serde_json::json!({
            "type": "error",
            "status": "error",
            "error": error,
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut out = serde_json::to_string(&payload).unwrap_or_else(|_| {
            "{\"type\":\"error\",\"status\":\"error\",\"error\":{\"code\":\"core:internal\"}}"
                .to_owned()
        });
        out.push('\n');
        out
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });
        let mut out = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\"}}".to_owned()
        });
        out.push('\n');
        out
    } else {
        format_error_text(error)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::for_error(error),
    }
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = format!(
        "status: error\ncode: {}\nmessage: {}\nkind: {}\n",
        error.code, error.message, error.kind
    );
    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

pub(crate) fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

pub(crate) fn to_pretty_line(value: &serde_json::Value) -> Result<String, CliError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

pub(crate) fn to_ndjson_line(value: &serde_json::Value) -> Result<String, CliError> {
    let mut out = serde_json::to_string(value)?;
    out.push('\n');
    Ok(out)
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

fn collect_scoped_env(prefix: &str) -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(prefix))
        .collect()
}
