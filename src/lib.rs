//! cibguard: validation and diagnostics for cluster configuration changes.
//!
//! cibguard decides, for a proposed mutation of the shared cluster
//! configuration, whether it is acceptable, must be rejected outright, or
//! may be rejected with an explicit operator override. The crux is a uniform
//! severity/override protocol: every validator returns an ordered list of
//! diagnostics, each either forceable (operator may downgrade it to a
//! warning) or a hard invariant that no flag can bypass.
//!
//! # Architecture
//!
//! - `core::reports`: the shared report model and the single force-rewrite
//!   pass where severities change.
//! - `core::metadata` / `core::values`: agent parameter schemas and the
//!   per-type value grammars.
//! - `core::property`: the property set/remove gates.
//! - `core::sbd`: watchdog subsystem state and the stonith-watchdog-timeout
//!   policy table.
//! - `core::preprocessor` / `core::constraints`: best-effort enrichment of
//!   duplicate-constraint diagnostics ahead of display.
//! - `core::snapshot`: offline cluster state backing the CLI.
//!
//! Validation is pure computation over caller-supplied snapshots; the only
//! external queries (watchdog state, constraint configuration) are lazy and
//! memoized per call.

pub mod cli;
pub mod core;
