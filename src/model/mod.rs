pub mod appearance;
pub mod item;

pub use appearance::Appearance;
pub use item::{FixedItem, ItemState, LiveItem, RosterItem, SubjectSource, content_eq};
