//! CLI module for dynbind
//!
//! ## Commands
//!
//! - `describe <CONTRACT>` - Print the parsed contract(s), as declarations or JSON
//! - `check <CONTRACT> <BINDING>` - Construct a proxy and report what is bound
//! - `call <CONTRACT> <BINDING> <METHOD> [ARGS...]` - Invoke one method and print the JSON result
//! - `emit-rust <CONTRACT>` - Print the typed Rust facade
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use crate::config::{AdapterConfig, DynbindConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Bad invocation or unreadable input, as opposed to a binding that fails its contract.
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Bind interface contracts to dynamic implementations
#[derive(Parser, Debug)]
#[command(name = "dynbind")]
#[command(version = VERSION)]
#[command(about = "Bind interface contracts to dynamic implementations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (dynbind.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Match method names ASCII case-insensitively
    #[arg(long, global = true)]
    pub ignore_case: bool,

    /// Allow bindings that miss required methods (calls to them fail)
    #[arg(long, global = true)]
    pub lenient: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the contracts declared in a file
    Describe {
        /// Contract declaration file
        #[arg(value_name = "CONTRACT")]
        contract: PathBuf,
        /// Print JSON instead of declaration syntax
        #[arg(long)]
        json: bool,
    },

    /// Check a JSON binding against a contract
    Check {
        #[arg(value_name = "CONTRACT")]
        contract: PathBuf,
        /// JSON object mapping method names to the values they return
        #[arg(value_name = "BINDING")]
        binding: PathBuf,
        /// Interface to use when the file declares several
        #[arg(long, value_name = "NAME")]
        interface: Option<String>,
    },

    /// Invoke one method through a proxy and print the result as JSON
    Call {
        #[arg(value_name = "CONTRACT")]
        contract: PathBuf,
        #[arg(value_name = "BINDING")]
        binding: PathBuf,
        #[arg(value_name = "METHOD")]
        method: String,
        /// Arguments as JSON values; anything that is not valid JSON is passed as a string
        #[arg(value_name = "ARGS", allow_hyphen_values = true)]
        args: Vec<String>,
        #[arg(long, value_name = "NAME")]
        interface: Option<String>,
    },

    /// Print a typed Rust facade for the contracts in a file
    EmitRust {
        #[arg(value_name = "CONTRACT")]
        contract: PathBuf,
        /// Only emit this interface
        #[arg(long, value_name = "NAME")]
        interface: Option<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        init_tracing(&config.logging.level);
        execute(cli, &config)
    });

    match result {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Load `--config` if given, otherwise use defaults.
pub fn load_config(path: Option<&Path>) -> CliResult<DynbindConfig> {
    match path {
        Some(path) => DynbindConfig::load(path)
            .map_err(|e| CliError::usage(format!("error: {}: {e}", path.display()))),
        None => Ok(DynbindConfig::default()),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Apply command-line overrides on top of the configured adapter options.
pub fn adapter_config(cli: &Cli, config: &DynbindConfig) -> AdapterConfig {
    let mut adapter = config.adapter;
    if cli.ignore_case {
        adapter = adapter.ignore_case();
    }
    if cli.lenient {
        adapter = adapter.lenient();
    }
    adapter
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli, config: &DynbindConfig) -> CliResult<ExitCode> {
    let adapter = adapter_config(&cli, config);
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Describe { contract, json } => commands::describe(&mut out, &contract, json),
        Command::Check {
            contract,
            binding,
            interface,
        } => commands::check(&mut out, &contract, &binding, interface.as_deref(), adapter),
        Command::Call {
            contract,
            binding,
            method,
            args,
            interface,
        } => commands::call(
            &mut out,
            &contract,
            &binding,
            commands::CallRequest {
                interface: interface.as_deref(),
                method: &method,
                args: &args,
            },
            adapter,
        ),
        Command::EmitRust { contract, interface } => commands::emit_rust(&mut out, &contract, interface.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================
