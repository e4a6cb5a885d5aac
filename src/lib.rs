//! ENVI-met `.simx` simulation control files.

/// TOML run descriptions.
pub mod config;
pub mod error;
/// Control-file writers.
pub mod io;
pub mod settings;
/// The run aggregate and its emission policy.
pub mod simulation;

pub use error::{Result, SimxError};
pub use simulation::{Section, SectionKind, Simulation};
