//! In-memory account ledger

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Receiver;
use ds_slot::{Ledger, PlayerAccount, SlotEngine, SlotResult, SpinOutcome};
use parking_lot::{Mutex, RwLock};
use rand::RngCore;

use crate::error::{LedgerError, LedgerResult};
use crate::events::{AccountEvent, EventBus};

type AccountSlot = Arc<Mutex<PlayerAccount>>;

/// Account store keyed by player id.
///
/// Each account sits behind its own mutex, so spins for one player are
/// serialized while different players settle in parallel. The outer map lock
/// is only held to look up or insert a slot.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: RwLock<HashMap<String, AccountSlot>>,
    offline: AtomicBool,
    events: EventBus,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-balance account, or return the existing one
    pub fn register(&self, player: &str) -> LedgerResult<PlayerAccount> {
        self.ensure_online()?;
        if player.trim().is_empty() {
            return Err(LedgerError::InvalidPlayer(player.to_string()));
        }

        if let Some(slot) = self.accounts.read().get(player) {
            return Ok(*slot.lock());
        }

        let created = {
            let mut accounts = self.accounts.write();
            match accounts.get(player) {
                Some(slot) => return Ok(*slot.lock()),
                None => {
                    accounts.insert(
                        player.to_string(),
                        Arc::new(Mutex::new(PlayerAccount::default())),
                    );
                    PlayerAccount::default()
                }
            }
        };

        log::info!("registered player {player}");
        self.events.publish(AccountEvent::Registered {
            player: player.to_string(),
        });
        Ok(created)
    }

    /// Admin credit grant
    pub fn grant_credit(&self, player: &str, amount: u64) -> LedgerResult<PlayerAccount> {
        self.ensure_online()?;
        let slot = self.slot(player)?;
        let mut stored = slot.lock();
        stored.credit = stored
            .credit
            .checked_add(amount)
            .ok_or_else(|| LedgerError::CreditOverflow(player.to_string()))?;
        let account = *stored;

        log::info!("granted {amount} credits to {player}, balance {}", account.credit);
        // published under the account lock so events follow commit order
        self.events.publish(AccountEvent::CreditGranted {
            player: player.to_string(),
            amount,
            account,
        });
        Ok(account)
    }

    /// All accounts, sorted by player id
    pub fn accounts(&self) -> Vec<(String, PlayerAccount)> {
        let mut list: Vec<_> = self
            .accounts
            .read()
            .iter()
            .map(|(player, slot)| (player.clone(), *slot.lock()))
            .collect();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Receive every account change from now on
    pub fn subscribe(&self) -> Receiver<AccountEvent> {
        self.events.subscribe()
    }

    /// Simulate storage failure; every read and write fails while offline
    pub fn set_offline(&self, offline: bool) {
        log::warn!("ledger {}", if offline { "offline" } else { "online" });
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> LedgerResult<()> {
        if self.is_offline() {
            Err(LedgerError::Offline)
        } else {
            Ok(())
        }
    }

    fn slot(&self, player: &str) -> LedgerResult<AccountSlot> {
        self.accounts
            .read()
            .get(player)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownPlayer(player.to_string()))
    }

    fn settled(&self, player: &str, outcome: &SpinOutcome) {
        self.events.publish(AccountEvent::SpinSettled {
            player: player.to_string(),
            stake: outcome.stake,
            payout: outcome.total_payout,
            account: outcome.account,
        });
    }
}

impl Ledger for MemoryLedger {
    fn snapshot(&self, player: &str) -> SlotResult<PlayerAccount> {
        self.ensure_online()?;
        Ok(*self.slot(player)?.lock())
    }

    fn commit(
        &self,
        player: &str,
        expected: &PlayerAccount,
        next: &PlayerAccount,
    ) -> SlotResult<PlayerAccount> {
        self.ensure_online()?;
        let slot = self.slot(player)?;
        let mut stored = slot.lock();
        if *stored != *expected {
            log::warn!("rejecting commit for {player}: stale snapshot");
            return Err(LedgerError::StaleSnapshot(player.to_string()).into());
        }
        *stored = *next;
        Ok(*next)
    }

    /// Holds the account lock from snapshot through commit and notification
    fn play_spin(
        &self,
        player: &str,
        engine: &SlotEngine,
        rng: &mut dyn RngCore,
    ) -> SlotResult<SpinOutcome> {
        self.ensure_online()?;
        let slot = self.slot(player)?;

        let mut stored = slot.lock();
        let outcome = engine.settle_spin(&*stored, rng)?;

        // storage may drop out while the grid was drawn
        if let Err(e) = self.ensure_online() {
            log::warn!("commit for {player} failed: {e}");
            return Err(e.into());
        }
        *stored = outcome.account;

        // still holding the account lock, so events follow commit order
        self.settled(player, &outcome);
        Ok(outcome)
    }
}
