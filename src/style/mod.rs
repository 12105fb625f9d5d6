//! Computed styles and the cascade that produces them.

mod cascade;
mod computed;
mod vocabulary;

pub use cascade::StyleResolver;
pub use computed::{ComputedEntry, ComputedStyleMap};
pub use vocabulary::{
    INHERITABLE_PROPERTIES, NON_INHERITABLE_GROUP_PROPERTIES, PRESENTATION_ATTRIBUTES, Vocabulary,
};
