//! Synckit: thread-safe building blocks for concurrent systems.
//!
//! # Overview
//!
//! Synckit is a small library of blocking concurrency primitives meant to
//! be composed into larger systems: a generic atomic value cell, a one-shot
//! completion signal, a completion counter, a counting semaphore with
//! cancellable acquisition, and a reader-writer-locked map for high-churn
//! entries. Everything is built on ordinary OS threads; nothing here
//! depends on an async runtime.
//!
//! # Core Guarantees
//!
//! - **No recoverable errors**: outcomes are values (`Option`, `bool`);
//!   pairing bugs such as negative counts and over-release panic loudly
//! - **Poison-proof waits**: internal locks recover from poisoning, so a
//!   panicking thread elsewhere never wedges a signal or semaphore
//! - **One-shot completion**: a signal fires exactly once and never
//!   rearms, under any number of concurrent firings
//! - **Cancellable blocking**: semaphore waits can be abandoned through a
//!   [`DoneSignal`] without leaking a slot
//! - **Zero-cost logging**: slow-path events go through [`tracing_compat`],
//!   which compiles to nothing without the `tracing-integration` feature
//!
//! # Module Structure
//!
//! - [`atomic_value`]: Generic single-slot atomic container
//! - [`signal`]: One-shot completion events and the pre-fired singleton
//! - [`wait_group`]: Completion counting with a selectable done signal
//! - [`semaphore`]: Counting semaphore with cancellable acquisition
//! - [`guarded_map`]: Reader-writer-locked hash map
//! - [`tracing_compat`]: Feature-gated logging facade

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]

pub mod atomic_value;
pub mod guarded_map;
pub mod semaphore;
pub mod signal;
pub mod tracing_compat;
pub mod wait_group;

#[cfg(test)]
pub mod test_utils;

// Re-exports for convenient access to the primitives
pub use atomic_value::AtomicValue;
pub use guarded_map::GuardedMap;
pub use semaphore::{Semaphore, SemaphorePermit};
pub use signal::{DoneSignal, Signal};
pub use wait_group::WaitGroup;
