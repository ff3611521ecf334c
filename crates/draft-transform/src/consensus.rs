//! Consensus merge across ranked boards and the prior signal blend.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info_span};

use draft_model::{Position, SourceRecord, canonical_player_name};

/// Share of the stability bonus added to the rank signal.
const STABILITY_WEIGHT: f64 = 0.35;
/// Weight of the seed rank in the prior blend.
pub const SEED_PRIOR_WEIGHT: f64 = 0.20;

/// Aggregated consensus for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusEntry {
    pub player_name: String,
    pub position: Position,
    pub mean_rank: f64,
    /// Population standard deviation of ranks; zero for a single board.
    pub rank_std: f64,
    pub sources: usize,
    pub signal: f64,
    pub confidence: f64,
}

/// Rank on a 1-100 signal scale, where rank 1 is about 100.
pub fn rank_signal(rank: f64) -> f64 {
    ((301.0 - rank) / 3.0).clamp(1.0, 100.0)
}

pub fn consensus_signal(mean_rank: f64, rank_std: f64) -> f64 {
    let stability_bonus = (4.0 - rank_std).max(0.0);
    (rank_signal(mean_rank) + STABILITY_WEIGHT * stability_bonus).clamp(1.0, 100.0)
}

/// Confidence in a consensus from the number of boards and their spread.
pub fn consensus_confidence(sources: usize, rank_std: f64) -> f64 {
    let source_factor: f64 = match sources {
        0 => 0.0,
        1 => 0.6,
        2 => 0.78,
        3 => 0.9,
        _ => 1.0,
    };
    let split_factor = if sources <= 1 {
        0.85
    } else if rank_std <= 8.0 {
        1.0
    } else if rank_std <= 14.0 {
        0.9
    } else if rank_std <= 22.0 {
        0.78
    } else {
        0.62
    };
    (source_factor * split_factor).clamp(0.45, 1.05)
}

/// Merges board records into one entry per (canonical name, position).
///
/// Only boards that list a player count toward that player's mean; a missing
/// board is not a zero. Output is ordered by mean rank, then name.
pub fn aggregate_consensus(records: &[SourceRecord]) -> Vec<ConsensusEntry> {
    let _span = info_span!("consensus", records = records.len()).entered();
    let mut grouped: BTreeMap<(String, Position), (String, Vec<f64>, BTreeSet<&str>)> =
        BTreeMap::new();
    for record in records {
        let key = (canonical_player_name(&record.player_name), record.position);
        let (_, ranks, sources) = grouped
            .entry(key)
            .or_insert_with(|| (record.player_name.clone(), Vec::new(), BTreeSet::new()));
        if sources.insert(record.source.as_str()) {
            ranks.push(record.rank);
        }
    }

    let mut entries: Vec<ConsensusEntry> = grouped
        .into_iter()
        .map(|((_, position), (player_name, ranks, sources))| {
            let n = ranks.len() as f64;
            let mean_rank = ranks.iter().sum::<f64>() / n;
            let variance = ranks.iter().map(|r| (r - mean_rank).powi(2)).sum::<f64>() / n;
            let rank_std = variance.sqrt();
            ConsensusEntry {
                player_name,
                position,
                mean_rank,
                rank_std,
                sources: sources.len(),
                signal: consensus_signal(mean_rank, rank_std),
                confidence: consensus_confidence(sources.len(), rank_std),
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        a.mean_rank
            .total_cmp(&b.mean_rank)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    debug!(players = entries.len(), "consensus aggregated");
    entries
}

/// Weighted mean over the parts that are present. Absent parts do not count.
pub fn weighted_mean(parts: &[(f64, f64)]) -> Option<f64> {
    let weight: f64 = parts.iter().map(|(w, _)| *w).sum();
    if weight <= 0.0 {
        return None;
    }
    Some(parts.iter().map(|(w, v)| w * v).sum::<f64>() / weight)
}

/// Prior signal from the seed rank and, when present, the consensus.
///
/// The consensus part is weighted by `base_weight * confidence`.
pub fn prior_signal(rank_seed: u32, consensus: Option<&ConsensusEntry>, base_weight: f64) -> f64 {
    let seed = rank_signal(f64::from(rank_seed));
    let mut parts = vec![(SEED_PRIOR_WEIGHT, seed)];
    if let Some(entry) = consensus {
        parts.push((base_weight * entry.confidence, entry.signal));
    }
    weighted_mean(&parts).unwrap_or(seed).clamp(1.0, 100.0)
}
