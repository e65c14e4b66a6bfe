//! radarscope headless application.
//!
//! Wires the simulation engine to a fixed-interval tick thread, a JSON
//! scenario file, and a line-oriented command stream.

pub mod config;
pub mod game_loop;
pub mod state;

pub use radarscope_core as core;
