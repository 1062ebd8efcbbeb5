//! Corpus data model and file persistence.

mod format;
mod model;
mod story_store;

pub use format::StoreFormat;
pub use model::{Edge, Event, GraphSet, Relation, RelationGraph, Story};
pub use story_store::StoryStore;
