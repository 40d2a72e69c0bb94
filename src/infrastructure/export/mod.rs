//! Export adapters

mod directory;

pub use directory::DirectoryExporter;
