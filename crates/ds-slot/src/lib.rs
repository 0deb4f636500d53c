//! # ds-slot: Deep Sea Slots spin-outcome engine
//!
//! Credit-based slot machine core: draws a 3×5 symbol grid with RTP-steered
//! weights, scores it against fixed paylines, and settles stake and payout
//! against a player account snapshot.
//!
//! ## Features
//!
//! - **Weighted Sampling**: Per-symbol weights, jackpot tier damped separately
//! - **RTP Control**: Step-function boost/suppress around a target ratio
//! - **Payline Evaluation**: Seven independent five-cell lines
//! - **Settlement**: All-or-nothing state machine per spin
//! - **Auto-Spin**: Paced repetition with cancellation between spins
//!
//! ## Architecture
//!
//! ```text
//! SlotEngine
//!     │
//!     ├── SymbolCatalog (ids, weights, payouts, tiers)
//!     ├── RtpController (account ratio → Adjustment)
//!     ├── GridGenerator → WeightedSampler
//!     └── PayTable (paylines → Evaluation)
//!           │
//!           v
//!     Settlement → SpinOutcome ──→ Ledger::commit
//! ```
//!
//! The engine never stores accounts. Persisting outcomes and serializing spins
//! per player belongs to a [`Ledger`] implementation.

pub mod account;
pub mod autospin;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod ledger;
pub mod paytable;
pub mod rtp;
pub mod sampler;
pub mod settlement;
pub mod stats;
pub mod symbols;
pub mod timing;

pub use account::*;
pub use autospin::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use ledger::*;
pub use paytable::*;
pub use rtp::*;
pub use sampler::*;
pub use settlement::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;
