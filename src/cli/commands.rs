//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.
//!
//! Each command has a path-based entry point used by `execute()` and works on
//! in-memory sources underneath, so the output can be tested without touching disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use dynbind_core::Value;
use miette::Diagnostic;

use crate::adapter::Adapter;
use crate::backend::emit_facades;
use crate::binding::DynamicBinding;
use crate::config::AdapterConfig;
use crate::contract::{InterfaceContract, parse_contracts};

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Input handling
// ============================================================================

/// Maximum input file size (10 MB); contracts and bindings are small documents.
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// Read a source file with size validation.
///
/// ## Errors
/// - The file cannot be accessed or read
/// - The file exceeds `MAX_SOURCE_SIZE`
pub fn read_source(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::usage(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::usage(format!(
            "File '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    tracing::debug!(path = %path.display(), bytes = metadata.len(), "reading input file");
    fs::read_to_string(path).map_err(|e| CliError::usage(format!("Error reading file '{}': {}", path.display(), e)))
}

/// Parse every interface in `source`, rendering declaration errors against the file.
pub fn load_contracts(file_name: &str, source: &str) -> CliResult<Vec<InterfaceContract>> {
    parse_contracts(source).map_err(|errors| {
        let mut message = dynbind_syntax::diagnostics::render(file_name, source, &errors);
        message.push_str(&format!("{} error(s) in {file_name}", errors.len()));
        CliError::usage(message)
    })
}

/// Pick the interface to operate on.
///
/// With no name, the file must declare exactly one interface.
pub fn select_interface(contracts: Vec<InterfaceContract>, name: Option<&str>) -> CliResult<InterfaceContract> {
    let declared = declared_names(&contracts);
    let count = contracts.len();
    let mut contracts = contracts.into_iter();

    match name {
        Some(name) => contracts
            .find(|c| c.name() == name)
            .ok_or_else(|| CliError::usage(format!("error: no interface named '{name}' (declared: {declared})"))),
        None if count == 1 => contracts
            .next()
            .ok_or_else(|| CliError::usage("error: no interfaces declared")),
        None if count == 0 => Err(CliError::usage("error: no interfaces declared")),
        None => Err(CliError::usage(format!(
            "error: several interfaces declared ({declared}); pass --interface NAME"
        ))),
    }
}

fn declared_names(contracts: &[InterfaceContract]) -> String {
    contracts
        .iter()
        .map(InterfaceContract::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Interpret a command-line argument: JSON if it parses, otherwise a plain string.
pub fn parse_argument(arg: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(arg)
        .map(Value::from)
        .unwrap_or_else(|_| Value::Str(arg.to_string()))
}

/// Format an error with its diagnostic help, if any.
fn report<E: Diagnostic>(err: &E) -> String {
    match err.help() {
        Some(help) => format!("error: {err}\n  help: {help}"),
        None => format!("error: {err}"),
    }
}

fn write_err(e: std::io::Error) -> CliError {
    CliError::failure(format!("Error writing output: {e}"))
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

// ============================================================================
// describe
// ============================================================================

/// `dynbind describe <CONTRACT> [--json]`
pub fn describe(out: &mut impl Write, contract: &Path, json: bool) -> CliResult<ExitCode> {
    let source = read_source(contract)?;
    describe_source(out, &display_name(contract), &source, json)
}

pub fn describe_source(out: &mut impl Write, file_name: &str, source: &str, json: bool) -> CliResult<ExitCode> {
    let contracts = load_contracts(file_name, source)?;

    if json {
        let text = serde_json::to_string_pretty(&contracts)
            .map_err(|e| CliError::failure(format!("Error serializing contracts: {e}")))?;
        writeln!(out, "{text}").map_err(write_err)?;
    } else {
        for (i, contract) in contracts.iter().enumerate() {
            if i > 0 {
                writeln!(out).map_err(write_err)?;
            }
            writeln!(out, "{contract}").map_err(write_err)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// check
// ============================================================================

/// `dynbind check <CONTRACT> <BINDING> [--interface NAME]`
pub fn check(
    out: &mut impl Write,
    contract: &Path,
    binding: &Path,
    interface: Option<&str>,
    config: AdapterConfig,
) -> CliResult<ExitCode> {
    let contract_source = read_source(contract)?;
    let binding_source = read_source(binding)?;
    check_source(
        out,
        (&display_name(contract), &contract_source),
        (&display_name(binding), &binding_source),
        interface,
        config,
    )
}

/// Construct a proxy from a contract source and a JSON binding, then list how each method is served.
///
/// A binding the contract rejects is a failure (exit 1), not a usage error.
pub fn check_source(
    out: &mut impl Write,
    (contract_name, contract_source): (&str, &str),
    (binding_name, binding_source): (&str, &str),
    interface: Option<&str>,
    config: AdapterConfig,
) -> CliResult<ExitCode> {
    let contract = select_interface(load_contracts(contract_name, contract_source)?, interface)?;
    let binding = DynamicBinding::from_json_str(binding_source)
        .map_err(|e| CliError::usage(format!("{binding_name}: {}", report(&e))))?;

    let proxy = Adapter::new(config)
        .construct(contract, binding)
        .map_err(|e| CliError::failure(report(&e)))?;

    let contract = proxy.contract();
    writeln!(out, "{}: ok", contract.name()).map_err(write_err)?;
    let width = contract
        .methods()
        .iter()
        .map(|m| m.name().len())
        .max()
        .unwrap_or(0);
    for method in contract.methods() {
        if let Some(resolution) = proxy.resolution(method.name()) {
            writeln!(out, "  {:<width$}  {resolution}", method.name()).map_err(write_err)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// call
// ============================================================================

/// Method and arguments for `dynbind call`.
#[derive(Debug, Clone, Copy)]
pub struct CallRequest<'a> {
    pub interface: Option<&'a str>,
    pub method: &'a str,
    pub args: &'a [String],
}

/// `dynbind call <CONTRACT> <BINDING> <METHOD> [ARGS...]`
pub fn call(
    out: &mut impl Write,
    contract: &Path,
    binding: &Path,
    request: CallRequest<'_>,
    config: AdapterConfig,
) -> CliResult<ExitCode> {
    let contract_source = read_source(contract)?;
    let binding_source = read_source(binding)?;
    call_source(
        out,
        (&display_name(contract), &contract_source),
        (&display_name(binding), &binding_source),
        request,
        config,
    )
}

/// Construct a proxy from sources, invoke one method and print its result as JSON.
pub fn call_source(
    out: &mut impl Write,
    (contract_name, contract_source): (&str, &str),
    (binding_name, binding_source): (&str, &str),
    request: CallRequest<'_>,
    config: AdapterConfig,
) -> CliResult<ExitCode> {
    let contract = select_interface(load_contracts(contract_name, contract_source)?, request.interface)?;
    let binding = DynamicBinding::from_json_str(binding_source)
        .map_err(|e| CliError::usage(format!("{binding_name}: {}", report(&e))))?;
    let proxy = Adapter::new(config)
        .construct(contract, binding)
        .map_err(|e| CliError::failure(report(&e)))?;

    let args = request.args.iter().map(|arg| parse_argument(arg)).collect();
    tracing::debug!(method = request.method, "calling through proxy");
    let result = proxy
        .invoke(request.method, args)
        .map_err(|e| CliError::failure(report(&e)))?;

    let text = serde_json::to_string(&result).map_err(|e| CliError::failure(format!("Error serializing result: {e}")))?;
    writeln!(out, "{text}").map_err(write_err)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// emit-rust
// ============================================================================

/// `dynbind emit-rust <CONTRACT> [--interface NAME]`
pub fn emit_rust(out: &mut impl Write, contract: &Path, interface: Option<&str>) -> CliResult<ExitCode> {
    let source = read_source(contract)?;
    emit_rust_source(out, &display_name(contract), &source, interface)
}

pub fn emit_rust_source(
    out: &mut impl Write,
    file_name: &str,
    source: &str,
    interface: Option<&str>,
) -> CliResult<ExitCode> {
    let mut contracts = load_contracts(file_name, source)?;
    if interface.is_some() {
        contracts = vec![select_interface(contracts, interface)?];
    }

    let code = emit_facades(&contracts).map_err(|e| CliError::failure(format!("error: {e}")))?;
    write!(out, "{code}").map_err(write_err)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================
