//! Output writers for the engine's control files.

pub mod emitter;
pub mod simx;

pub use emitter::{Field, SectionEmitter, XmlSectionWriter};
pub use simx::{export_simx, export_simx_to, simx_path, write_simx};
