//! Core types and definitions for the radarscope traffic simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geographic types, components, commands, snapshot views, events,
//! airport reference data, and constants.
//! It has no dependency on any runtime framework.

pub mod airports;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
