//! Per-player metric passes over the shared tick store.
//!
//! Each pass is a pure function of `&TickStore`, the config and a player id.
//! None of them mutate shared state, so players can be analyzed in parallel.

pub mod consistency;
pub mod fov;
pub mod reaction;
pub mod scoring;
pub mod snap;
