//! # Observability & Tracing
//!
//! Every generated action runs inside an `action` span carrying the
//! `resource` and `action` fields, so a refresh dispatched from a create shows
//! up nested under it:
//!
//! ```text
//! INFO action{resource=books action=createBook}: Action ok
//! INFO action{resource=books action=createBook}:action{resource=books action=fetchBooks}: Action ok
//! ```
//!
//! ## What Gets Traced
//!
//! - **Action settle**: `info` when an action succeeds, `warn` when it fails
//!   or is halted by a state-shape error
//! - **Payloads**: `debug` for the action data and the built request descriptor
//! - **Refreshes**: `debug` when a mutating action re-fetches the collection
//! - **Module assembly**: `debug` with the number of state keys, mutations and actions
//!
//! ## Usage Examples
//!
//! ```bash
//! # Settled actions and failures
//! RUST_LOG=info cargo test
//!
//! # Action data and request descriptors
//! RUST_LOG=crud_bindings=debug cargo test
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once: later calls leave the first subscriber in place.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
