pub mod identity;

pub use identity::{IDENTITY_NAME_SUFFIX, Identity, IdentityCache};
