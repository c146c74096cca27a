pub mod config;
pub mod error;
pub mod fields;
pub mod linker;
pub mod time;
pub mod types;

pub use config::Config;
pub use error::{CatalogError, IncompleteDocument, Result};
pub use linker::link;
pub use types::*;
