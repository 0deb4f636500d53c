//! # ds-ledger: account store for Deep Sea Slots
//!
//! In-memory [`ds_slot::Ledger`] implementation with per-account locking,
//! admin credit grants and push notifications of account changes.
//!
//! ```text
//! MemoryLedger
//!     ├── RwLock<HashMap<player, Arc<Mutex<PlayerAccount>>>>
//!     └── EventBus ──→ Receiver<AccountEvent> (one per subscriber)
//! ```

pub mod error;
pub mod events;
pub mod memory;

pub use error::*;
pub use events::*;
pub use memory::*;
