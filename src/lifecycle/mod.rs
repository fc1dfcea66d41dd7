//! Process-level setup for applications embedding the engine.
//!
//! The engine itself only emits `tracing` events; installing a subscriber is
//! the host's choice. [`setup_tracing`] is the default one.

pub mod tracing;

pub use self::tracing::setup_tracing;
