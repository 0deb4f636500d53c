//! Batch simulation across independent players

use anyhow::Context;
use ds_ledger::MemoryLedger;
use ds_slot::{
    AutoSpinSequencer, Ledger, NoDelay, PlayerAccount, SessionStats, SlotEngine, SpeedTier,
    StopReason,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

/// Batch run parameters
#[derive(Debug, Clone, Serialize)]
pub struct SimulationParams {
    pub players: usize,
    pub spins: u32,
    pub credit: u64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub account: PlayerAccount,
    pub stop: StopReason,
    pub rtp: f64,
    pub hit_rate: f64,
    pub stats: SessionStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub params: SimulationParams,
    pub target_rtp: f64,
    pub rtp: f64,
    pub hit_rate: f64,
    pub aggregate: SessionStats,
    pub players: Vec<PlayerSummary>,
}

fn player_id(index: usize) -> String {
    format!("player-{index:04}")
}

/// One player's auto-spin session, summarized from the ledger's final account
fn play_player(
    ledger: &MemoryLedger,
    engine: &SlotEngine,
    params: &SimulationParams,
    index: usize,
) -> anyhow::Result<PlayerSummary> {
    let player = player_id(index);
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(index as u64));
    let sequencer = AutoSpinSequencer::new(ledger, engine);
    let report = sequencer.run(
        &player,
        params.spins,
        SpeedTier::Turbo,
        &mut rng,
        &mut NoDelay::default(),
        |_| {},
    );
    let account = ledger
        .snapshot(&player)
        .with_context(|| format!("Failed to read final account for {player}"))?;

    Ok(PlayerSummary {
        rtp: report.stats.rtp(),
        hit_rate: report.stats.hit_rate(),
        player,
        account,
        stop: report.stop,
        stats: report.stats,
    })
}

/// Play every player's session in parallel.
///
/// Player `i` draws from a ChaCha8 stream seeded with `seed + i`, so reports
/// are reproducible whatever the thread count.
pub fn run(engine: &SlotEngine, params: &SimulationParams) -> anyhow::Result<SimulationReport> {
    let ledger = MemoryLedger::new();
    for index in 0..params.players {
        let player = player_id(index);
        ledger.register(&player)?;
        ledger.grant_credit(&player, params.credit)?;
    }

    log::info!(
        "simulating {} players x {} spins on {} threads",
        params.players,
        params.spins,
        rayon::current_num_threads()
    );

    let players = (0..params.players)
        .into_par_iter()
        .map(|index| play_player(&ledger, engine, params, index))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut aggregate = SessionStats::default();
    for summary in &players {
        aggregate.merge(&summary.stats);
    }

    log::info!(
        "simulation done: {} spins, RTP {:.4}, hit rate {:.4}",
        aggregate.total_spins,
        aggregate.rtp(),
        aggregate.hit_rate()
    );

    Ok(SimulationReport {
        params: params.clone(),
        target_rtp: engine.rtp().target(),
        rtp: aggregate.rtp(),
        hit_rate: aggregate.hit_rate(),
        aggregate,
        players,
    })
}
