//! Core library for the user-needs catalog: the wire-compatible data
//! model, snapshot loading, the five-dimension filter engine, statistics
//! aggregation, and the dashboard state container that front ends embed.
//!
//! Everything here operates on in-memory data handed in by the caller.
//! No function in this crate performs network or terminal I/O; the only
//! filesystem access is loading snapshots and configuration.

pub mod config;
pub mod dashboard;
pub mod filter;
pub mod graph;
pub mod id;
pub mod model;
pub mod snapshot;
pub mod stats;
