//! Step definitions for best-attempt tracking scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
