//! Purpose: `widget-unpack` CLI entry point.
//! Role: Binary crate root; parses args, runs one unpack pass, reports the summary.
//! Invariants: stdout carries only the run summary (human line or JSON with `--json`).
//! Invariants: Logs and fatal errors go to stderr; errors are JSON when stderr is not a TTY.
//! Invariants: `--color` governs both log and error coloring on stderr.
//! Invariants: Exit code is 0 for a clean run, else `to_exit_code` of the first failure.
use std::error::Error as StdError;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod summary_json;

use summary_json::summary_json;
use widget_unpack::api::{
    CollectRequest, Error, ErrorKind, ReadmeMode, Summary, UnpackConfig, to_exit_code, unpack,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage).with_message(clap_error_summary(&err)),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing(cli.color);

    let request = CollectRequest {
        directory: cli.directory,
        files: cli.files,
    };
    let output_dir = cli.output.display().to_string();
    let config = UnpackConfig::new(cli.output).with_readme(cli.readme.into());
    let summary = unpack(&request, config);

    if summary.files_total == 0 {
        println!("No files specified.");
        return Ok(RunOutcome::ok());
    }

    if cli.json {
        emit_json(summary_json(&output_dir, &summary));
    } else {
        println!("{}", summary_line(&output_dir, &summary));
    }

    Ok(match summary.first_failure_kind() {
        Some(kind) => RunOutcome::with_code(to_exit_code(kind)),
        None => RunOutcome::ok(),
    })
}

#[derive(Parser)]
#[command(
    name = "widget-unpack",
    version,
    about = "Unpack dashboard widget JSON exports into editable source files",
    long_about = None,
    after_help = r#"EXAMPLES
  $ widget-unpack -f gauge.json
  $ widget-unpack -d exports/ -o widgets-src
  $ widget-unpack -d exports/ -f extra/bundle.json --readme overwrite --json

OUTPUT
  <output>/README.md                                   one section per widget
  <output>/_assets/imgs/<title>.png                    preview images
  <output>/Widgets/<name>/<norm>.js|.css|.html         descriptor sources
  <output>/Widgets/<name>/<norm>.settings.json         settings schema
  <output>/Widgets/<name>/<norm>.datakey.settings.json data key settings schema
  <output>/Widgets/<name>/src/<norm>.json              full widget JSON
  <output>/Widgets/<name>/Actions/<group>/<action>/    custom action sources
  <output>/Widgets/<bundle>.bundle.json                bundle JSON

NOTES
  - Inputs are deduplicated and processed in sorted path order
  - Set RUST_LOG=debug to log every file written"#
)]
struct Cli {
    #[arg(
        short = 'd',
        long,
        help = "Directory whose files are all read (non-recursive)",
        value_hint = ValueHint::DirPath
    )]
    directory: Option<PathBuf>,
    #[arg(
        short = 'f',
        long,
        num_args = 1..,
        help = "Individual widget or bundle files",
        value_hint = ValueHint::FilePath
    )]
    files: Vec<PathBuf>,
    #[arg(
        short = 'o',
        long,
        default_value = "output",
        help = "Base output directory",
        value_hint = ValueHint::DirPath
    )]
    output: PathBuf,
    #[arg(
        long,
        default_value = "append",
        value_enum,
        help = "README handling: append keeps earlier sections, overwrite starts fresh"
    )]
    readme: ReadmeModeCli,
    #[arg(long, help = "Emit the run summary as JSON")]
    json: bool,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ReadmeModeCli {
    Append,
    Overwrite,
}

impl From<ReadmeModeCli> for ReadmeMode {
    fn from(value: ReadmeModeCli) -> Self {
        match value {
            ReadmeModeCli::Append => ReadmeMode::Append,
            ReadmeModeCli::Overwrite => ReadmeMode::Overwrite,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn init_tracing(color_mode: ColorMode) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(color_mode.use_color(io::stderr().is_terminal()))
        .with_writer(io::stderr)
        .try_init();
}

fn summary_line(output_dir: &str, summary: &Summary) -> String {
    let mut line = format!(
        "Unpacked {} widget(s) and {} bundle(s) from {} file(s) into {output_dir}: \
         {} file(s) written, {} action(s), {} image(s)",
        summary.widgets,
        summary.bundles,
        summary.files_total,
        summary.files_written,
        summary.actions,
        summary.images,
    );
    if !summary.is_clean() {
        line.push_str(&format!(
            "; {} skipped file(s), {} failure(s)",
            summary.skipped_files(),
            summary.failures.len()
        ));
    }
    line
}

fn emit_json(value: Value) {
    let json = serde_json::to_string_pretty(&value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    match err.message() {
        Some(message) => message.to_string(),
        None => format!("{} error", err.kind().as_str().to_lowercase()),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(err.kind().as_str()));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = vec![format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    )];
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.push(format!(
        "{} Try `widget-unpack --help`.",
        colorize_label("hint:", use_color, AnsiColor::Yellow)
    ));
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{Cli, ReadmeModeCli, summary_line};
    use clap::Parser;
    use widget_unpack::api::Summary;

    #[test]
    fn files_flag_accepts_several_values() {
        let cli = Cli::try_parse_from(["widget-unpack", "-f", "a.json", "b.json", "-o", "out"])
            .expect("parse");
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.output, std::path::PathBuf::from("out"));
        assert!(cli.directory.is_none());
        assert!(matches!(cli.readme, ReadmeModeCli::Append));
    }

    #[test]
    fn summary_line_mentions_failures_only_when_present() {
        let summary = Summary {
            files_total: 1,
            widgets: 1,
            files_written: 6,
            ..Summary::default()
        };
        let line = summary_line("output", &summary);
        let expected = "Unpacked 1 widget(s) and 0 bundle(s) from 1 file(s) into output";
        assert!(line.starts_with(expected));
        assert!(!line.contains("failure"));
    }
}
