//! Decides which license packages can be removed from a Steam account and
//! drives the removal run.
//!
//! This crate holds the **business logic** only. It performs no I/O of its
//! own: the caller loads [`LibraryState`](dustman_steam::LibraryState) and
//! [`PackageIndex`](dustman_steam::PackageIndex) up front and supplies a
//! [`PackageRemover`] that talks to the network.
//!
//! # Rule
//!
//! A package is removed only if it grants no title the library still shows.
//! Titles missing from the visibility config (DLC, tools) never block a
//! removal.

pub mod decision;
pub mod error;
pub mod remover;
pub mod run;

// Re-export primary types for convenience.
pub use decision::{Decision, RemoveReason, SkipReason, Verdict, decide, eligible_packages};
pub use error::RemovalError;
pub use remover::{DryRunRemover, PackageRemover};
pub use run::{Pruner, RunSummary};
