//! Handler implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

#[cfg(feature = "console")]
pub use console::ConsoleHandler;
#[cfg(feature = "file")]
pub use file::FileHandler;
pub use memory::MemoryHandler;

pub use crate::core::LogHandler;
