//! ECS systems run by the engine each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` when
//! read-only). All per-aircraft state lives in components.

pub mod movement;
pub mod snapshot;
