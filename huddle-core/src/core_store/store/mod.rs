/*
    Store subsystem - Indexed in-memory catalog
*/

pub mod collection;
pub mod errors;
pub mod index;
pub mod registry;

pub use collection::{Indexed, IndexedCollection};
pub use errors::*;
pub use index::{CaseInsensitive, MultiIndexStore};
pub use registry::EntityRegistry;
