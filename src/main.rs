//! dynbind CLI entry point
//!
//! Logging is set up inside `cli::run()` once the configuration is known, so that
//! `[logging] level` in `dynbind.toml` applies when `RUST_LOG` is unset.

fn main() {
    dynbind::cli::run();
}
