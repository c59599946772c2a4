pub mod banner;
pub mod diff;
pub mod roster;

pub use banner::Banner;
pub use diff::DiffEngine;
pub use roster::Roster;
