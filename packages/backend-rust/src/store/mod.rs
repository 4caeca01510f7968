//! Storage traits and implementations

mod memory;
mod traits;

pub use memory::InMemoryStore;
pub use traits::{ProfileStore, RecommendationStore, SessionStore, StoreError};
