//! Kernel for Shelf: the module contract, lifecycle registry, settings and
//! the state shared with request handlers.

pub mod module;
pub mod registry;
pub mod settings;
pub mod state;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
pub use state::AppState;
