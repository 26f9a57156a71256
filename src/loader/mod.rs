// ABOUTME: Loader module converting rendered template text into typed values
// ABOUTME: Exports the loader kinds and the shared registry that resolves them by name

pub mod error;
pub mod registry;

pub use error::{LoaderError, Result};
pub use registry::{Loader, LoaderRegistry};
