//! Hand-written usage demonstrations, run like narrated integration tests.
//!
//! These are ordinary library modules, not Cargo-discovered `examples/`
//! binaries — that directory name is reserved for the read-only reference
//! pack mounted at the workspace root. Each `run()` builds a small object
//! graph, round-trips it through the codec, and asserts the properties that
//! matter for that scenario.

pub mod basic;
pub mod cycles;
pub mod relationships;

/// Runs every demo in sequence. Useful as a single smoke-check entry point.
pub fn run_all() -> crate::errors::CodecResult<()> {
    basic::run()?;
    relationships::run()?;
    cycles::run()?;
    Ok(())
}
