//! Keeps a bounded, ordered grid of display slots (a roster) synchronized with
//! a remote viewer over a narrow, mutation-oriented wire protocol, emitting the
//! minimal message set per reconciliation pass.
//!
//! The pieces, leaves first: [`model`] holds entries and their provider seam,
//! [`store`] the bounded slot mapping, [`cache`] the deterministic identity
//! cache shared across rosters, [`protocol`] the wire messages, [`sync`] the
//! diff engine plus the [`Roster`](sync::Roster) batch controller and the
//! [`Banner`](sync::Banner) header/footer pass-through, and [`transport`] the
//! delivery seam.
//!
//! ```
//! use std::sync::Arc;
//! use rostersync::cache::IdentityCache;
//! use rostersync::config::RosterConfig;
//! use rostersync::model::{Appearance, FixedItem};
//! use rostersync::sync::Roster;
//! use rostersync::transport::NullTransport;
//!
//! let mut roster = Roster::new(
//!     RosterConfig::new(20),
//!     Arc::new(IdentityCache::new()),
//!     Arc::new(NullTransport),
//! )
//! .unwrap();
//! roster.set(0, Box::new(FixedItem::new("alice", 40, Appearance::blank()))).unwrap();
//! assert_eq!(roster.len(), 1);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod store;
pub mod sync;
pub mod transport;

pub use cache::IdentityCache;
pub use config::{MAX_SLOTS, RosterConfig};
pub use error::RosterError;
pub use model::{Appearance, FixedItem, ItemState, LiveItem, RosterItem, SubjectSource};
pub use protocol::{EntryMode, ViewerMessage};
pub use store::SlotStore;
pub use sync::{Banner, DiffEngine, Roster};
pub use transport::{NullTransport, ViewerTransport};
