// crates/contract-parity-cli/src/main.rs
// ============================================================================
// Module: Contract Parity CLI Entry Point
// Description: Command dispatcher for static checks, live validation, and DB tests.
// Purpose: Run one check suite, render its report, and map it to an exit code.
// Dependencies: clap, contract-parity-{core,config,live,db}, thiserror
// ============================================================================

//! ## Overview
//! `contract-parity check` compares backend route annotations with frontend
//! API calls, `contract-parity validate` exercises a running backend, and
//! `contract-parity db test` verifies database connectivity. Each command
//! produces a [`RunReport`]; the process exits 0 exactly when the report has
//! no failures. All user-facing strings are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap::error::ErrorKind;
use contract_parity_cli::audit::FileAuditSink;
use contract_parity_cli::audit::NoopAuditSink;
use contract_parity_cli::audit::ReportAuditSink;
use contract_parity_cli::audit::StderrAuditSink;
use contract_parity_cli::audit::record_report;
use contract_parity_cli::render::RenderOptions;
use contract_parity_cli::render::ReportSubject;
use contract_parity_cli::render::render_json;
use contract_parity_cli::render::render_text;
use contract_parity_cli::t;
use contract_parity_config::DatabaseSettings;
use contract_parity_config::DotEnv;
use contract_parity_config::ParityConfig;
use contract_parity_core::IntegrationChecker;
use contract_parity_core::RunReport;
use contract_parity_core::SourceText;
use contract_parity_db::TunnelState;
use contract_parity_db::connect;
use contract_parity_db::describe_target;
use contract_parity_db::ensure_tunnel;
use contract_parity_db::identify;
use contract_parity_live::LiveValidator;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum source file size read by `check`.
const MAX_SOURCE_BYTES: usize = 8 * 1024 * 1024;
/// Timeout for the local tunnel port probe.
const TUNNEL_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
/// `--audit-log` value that selects stderr.
const STDERR_AUDIT_PATH: &str = "-";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Contract parity command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "contract-parity",
    about = "Checks that a frontend and a backend agree on their HTTP contract.",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print the CLI version and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare backend routes with frontend API calls.
    Check(CheckCommand),
    /// Validate a running backend over HTTP.
    Validate(ValidateCommand),
    /// Database helpers.
    Db {
        /// Selected database subcommand.
        #[command(subcommand)]
        command: DbCommand,
    },
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Project root containing the backend and frontend sources.
    #[arg(long = "project-root", value_name = "DIR", default_value = ".")]
    project_root: PathBuf,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output options.
    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Backend base URL; overrides `live.base_url`.
    #[arg(long, value_name = "URL")]
    url: Option<String>,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output options.
    #[command(flatten)]
    output: OutputArgs,
}

/// Database subcommands.
#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Open a session and report the server identity.
    Test(DbTestCommand),
}

/// Arguments for `db test`.
#[derive(Args, Debug)]
struct DbTestCommand {
    /// Project root used to resolve the config, `.env`, and tunnel script.
    #[arg(long = "project-root", value_name = "DIR", default_value = ".")]
    project_root: PathBuf,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// `.env` file; overrides `database.env_file`.
    #[arg(long = "env-file", value_name = "PATH")]
    env_file: Option<PathBuf>,
    /// Tunnel script; overrides `database.tunnel_script`.
    #[arg(long = "tunnel-script", value_name = "PATH")]
    tunnel_script: Option<PathBuf>,
    /// Output options.
    #[command(flatten)]
    output: OutputArgs,
}

/// Report output options shared by every command.
#[derive(Args, Debug)]
struct OutputArgs {
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
    format: OutputFormatArg,
    /// Append JSON-lines audit events to this file (`-` for stderr).
    #[arg(long = "audit-log", value_name = "PATH")]
    audit_log: Option<PathBuf>,
    /// Disable ANSI colours in text output.
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    no_color: bool,
}

/// Report output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormatArg {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            write_stdout_bytes(err.render().to_string().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            let rendered = err.render().to_string();
            return Err(CliError::new(t!("main.usage_failed", error = rendered.trim_end())));
        }
    };

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Validate(command) => command_validate(&command),
        Commands::Db {
            command: DbCommand::Test(command),
        } => command_db_test(&command),
    }
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes `check`.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let root = command.project_root.as_path();
    let config = load_config(command.config.as_deref(), root)?;
    let backend = read_source(&config.sources.backend_path(root))?;
    let frontend = read_source(&config.sources.frontend_path(root))?;
    let checker = IntegrationChecker::new(&config.checker_settings())
        .map_err(|err| CliError::new(t!("check.init_failed", error = err)))?;
    let outcome = checker.run(&backend, &frontend);
    emit_report(&outcome.report, ReportSubject::Integration, &command.output)
}

/// Reads a source file into a [`SourceText`]; a missing file is not an error.
fn read_source(path: &Path) -> CliResult<SourceText> {
    let display = path.display().to_string();
    if !path.is_file() {
        return Ok(SourceText::Missing {
            path: display,
        });
    }
    let bytes = read_bytes_with_limit(path, MAX_SOURCE_BYTES).map_err(|err| match err {
        ReadLimitError::Io(error) => {
            CliError::new(t!("source.read_failed", path = display, error = error))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!("source.too_large", path = display, size = size, limit = limit)),
    })?;
    let text = String::from_utf8(bytes)
        .map_err(|_| CliError::new(t!("source.not_utf8", path = display)))?;
    Ok(SourceText::Loaded {
        path: display,
        text,
    })
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Executes `validate`.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref(), Path::new("."))?;
    let settings = match &command.url {
        Some(url) => config
            .live
            .with_base_url(url)
            .map_err(|err| CliError::new(t!("validate.url_invalid", error = err)))?,
        None => config.live,
    };
    let validator = LiveValidator::new(&settings)
        .map_err(|err| CliError::new(t!("validate.init_failed", error = err)))?;
    let report = validator.run();
    emit_report(&report, ReportSubject::Backend, &command.output)
}

// ============================================================================
// SECTION: Database Command
// ============================================================================

/// Executes `db test`.
fn command_db_test(command: &DbTestCommand) -> CliResult<ExitCode> {
    let root = command.project_root.as_path();
    let config = load_config(command.config.as_deref(), root)?;
    let env_file =
        command.env_file.clone().unwrap_or_else(|| root.join(&config.database.env_file));
    let tunnel_script = command
        .tunnel_script
        .clone()
        .or_else(|| config.database.tunnel_script.as_ref().map(|script| root.join(script)));
    let dotenv =
        DotEnv::load(&env_file).map_err(|err| CliError::new(t!("db.env_failed", error = err)))?;
    let settings = DatabaseSettings::from_env(&dotenv)
        .map_err(|err| CliError::new(t!("db.env_failed", error = err)))?;
    let connect_timeout = Duration::from_millis(config.database.connect_timeout_ms);
    let report = database_report(&settings, tunnel_script.as_deref(), connect_timeout);
    emit_report(&report, ReportSubject::Database, &command.output)
}

/// Brings up the tunnel if needed, connects, and records the outcome.
fn database_report(
    settings: &DatabaseSettings,
    tunnel_script: Option<&Path>,
    connect_timeout: Duration,
) -> RunReport {
    let mut report = RunReport::new();
    report.info("db.target", t!("db.target", target = describe_target(settings)));

    match ensure_tunnel(settings, tunnel_script, TUNNEL_PROBE_TIMEOUT) {
        Ok(TunnelState::Direct) => {
            report.info("db.tunnel.direct", t!("db.tunnel.direct", host = settings.host));
        }
        Ok(TunnelState::AlreadyOpen) => {
            report.pass("db.tunnel.open", t!("db.tunnel.open", port = settings.port));
        }
        Ok(TunnelState::Started {
            output,
        }) => {
            report.pass("db.tunnel.started", t!("db.tunnel.started", port = settings.port));
            if !output.is_empty() {
                report.info("db.tunnel.output", t!("db.tunnel.output", output = output));
            }
        }
        Err(err) => {
            report.fail("db.tunnel.failed", t!("db.tunnel.failed", error = err));
            return report;
        }
    }

    let identity = connect(settings, connect_timeout)
        .and_then(|mut client| identify(&mut client));
    match identity {
        Ok(identity) => {
            report.pass("db.connected", t!("db.connected", version = identity.version));
            report.pass(
                "db.identity",
                t!("db.identity", database = identity.database, user = identity.user),
            );
        }
        Err(err) => {
            report.fail("db.connect_failed", t!("db.connect_failed", error = err));
        }
    }
    report
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Loads configuration, mapping errors to a localized message.
fn load_config(explicit: Option<&Path>, search_root: &Path) -> CliResult<ParityConfig> {
    ParityConfig::load(explicit, search_root)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Renders `report`, records audit events, and maps the verdict to an exit code.
fn emit_report(
    report: &RunReport,
    subject: ReportSubject,
    output: &OutputArgs,
) -> CliResult<ExitCode> {
    let sink = open_audit_sink(&AuditTarget::from_arg(output.audit_log.as_deref()))?;
    record_report(sink.as_ref(), subject.as_str(), report);

    let rendered = match output.format {
        OutputFormatArg::Text => render_text(
            report,
            subject,
            RenderOptions {
                color: !output.no_color,
            },
        ),
        OutputFormatArg::Json => render_json(report, subject)
            .map_err(|err| CliError::new(t!("render.json_failed", error = err)))?,
    };
    write_stdout_bytes(rendered.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;

    Ok(if report.succeeded() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Audit destination named by `--audit-log`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AuditTarget {
    /// No audit log.
    Disabled,
    /// JSON lines on stderr (`--audit-log -`).
    Stderr,
    /// JSON lines appended to a file.
    File(PathBuf),
}

impl AuditTarget {
    /// Maps the `--audit-log` value to a destination.
    fn from_arg(path: Option<&Path>) -> Self {
        match path {
            None => Self::Disabled,
            Some(path) if path == Path::new(STDERR_AUDIT_PATH) => Self::Stderr,
            Some(path) => Self::File(path.to_path_buf()),
        }
    }
}

/// Opens the audit sink selected by `--audit-log`.
fn open_audit_sink(target: &AuditTarget) -> CliResult<Box<dyn ReportAuditSink>> {
    match target {
        AuditTarget::Disabled => Ok(Box::new(NoopAuditSink)),
        AuditTarget::Stderr => Ok(Box::new(StderrAuditSink)),
        AuditTarget::File(path) => {
            let sink = FileAuditSink::new(path).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path.display(), error = err))
            })?;
            Ok(Box::new(sink))
        }
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads `path` fully, failing when it exceeds `max_bytes`.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
