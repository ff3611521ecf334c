//! Big-board assembly.
//!
//! Joins consensus, combine and production onto the seeded prospects, grades
//! each one, attaches comps, team fit, ROI and calibrated probability, then
//! ranks by final grade. Equal grades rank by player id.

use std::time::Instant;

use tracing::{debug, info, info_span};

use draft_model::{
    BoardEntry, CalibrationModel, CombineRecord, CompProfile, MetricValue, ProductionRecord,
    Prospect, QaReport, RoiPrior, SourceRecord, TeamNeedProfile,
};
use draft_standards::GradingStandards;

use crate::calibration::success_probability;
use crate::comps::{CompEngine, prospect_profile};
use crate::consensus::{ConsensusEntry, aggregate_consensus};
use crate::error::{Result, TransformError};
use crate::grading::{GradeInputs, grade_prospect};
use crate::matching::{MatchKind, NameIndex};
use crate::ras::ras_tier;
use crate::roi::{pick_band_for_projection, roi_adjustment};
use crate::team_fit::best_team_fit;

pub const STAGE: &str = "board";

/// Normalized inputs for one board build.
#[derive(Debug, Clone, Copy)]
pub struct BoardInputs<'a> {
    pub prospects: &'a [Prospect],
    pub consensus: &'a [SourceRecord],
    pub combine: &'a [CombineRecord],
    pub production: &'a [ProductionRecord],
    pub teams: &'a [TeamNeedProfile],
    pub comp_pool: &'a [CompProfile],
    pub calibration: Option<&'a CalibrationModel>,
    pub roi_priors: &'a [RoiPrior],
}

/// Join counts for the board report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub consensus_exact: usize,
    pub consensus_fuzzy: usize,
    pub combine: usize,
    pub production: usize,
    pub with_comps: usize,
}

#[derive(Debug, Clone)]
pub struct BoardBuild {
    pub entries: Vec<BoardEntry>,
    pub consensus: Vec<ConsensusEntry>,
    pub joins: JoinStats,
    pub qa: QaReport,
}

fn count_match(kind: MatchKind, stats: &mut JoinStats) {
    match kind {
        MatchKind::Exact => stats.consensus_exact += 1,
        MatchKind::Fuzzy(_) => stats.consensus_fuzzy += 1,
    }
}

pub fn build_board(inputs: BoardInputs<'_>, standards: &GradingStandards) -> Result<BoardBuild> {
    let _span = info_span!(STAGE, prospects = inputs.prospects.len()).entered();
    let start = Instant::now();
    if standards.round_map.is_empty() {
        return Err(TransformError::EmptyRoundMap);
    }
    let threshold = standards.consensus.fuzzy_threshold;

    let consensus = aggregate_consensus(inputs.consensus);
    let mut consensus_index = NameIndex::new(threshold);
    for entry in &consensus {
        consensus_index.insert(&entry.player_name, Some(entry.position), entry);
    }
    let mut combine_index = NameIndex::new(threshold);
    for record in inputs.combine {
        combine_index.insert(&record.player_name, record.position, record);
    }
    let mut production_index = NameIndex::new(threshold);
    for record in inputs.production {
        production_index.insert(&record.player_name, Some(record.position), record);
    }
    let engine = CompEngine::new(inputs.comp_pool.to_vec(), standards.comps.clone());

    let mut joins = JoinStats::default();
    let mut entries = Vec::with_capacity(inputs.prospects.len());
    for prospect in inputs.prospects {
        let consensus_match = consensus_index.find(&prospect.player_name, prospect.position);
        if let Some((_, kind)) = consensus_match {
            count_match(kind, &mut joins);
            if let MatchKind::Fuzzy(score) = kind {
                debug!(player = %prospect.player_name, score, "fuzzy consensus match");
            }
        }
        let consensus_entry = consensus_match.map(|(entry, _)| *entry);
        let combine = combine_index
            .find(&prospect.player_name, prospect.position)
            .map(|(record, _)| *record);
        let production = production_index
            .find(&prospect.player_name, prospect.position)
            .map(|(record, _)| *record);
        joins.combine += usize::from(combine.is_some());
        joins.production += usize::from(production.is_some());

        let graded = grade_prospect(
            GradeInputs {
                prospect,
                consensus: consensus_entry,
                combine,
                production,
            },
            standards,
        )?;
        let scores = graded.scores;

        let profile = prospect_profile(
            prospect,
            combine,
            scores.production.value(),
            scores.trait_score,
        );
        let comps = engine.find(&profile);
        joins.with_comps += usize::from(!comps.is_empty());

        let band = pick_band_for_projection(&scores.round_projection);
        let best_fit = best_team_fit(inputs.teams, prospect.position);
        entries.push(BoardEntry {
            board_rank: 0,
            prospect: prospect.clone(),
            consensus_mean_rank: consensus_entry.map(|entry| entry.mean_rank),
            consensus_rank_std: consensus_entry.map(|entry| entry.rank_std),
            consensus_sources: consensus_entry.map_or(0, |entry| entry.sources),
            consensus_signal: consensus_entry.map(|entry| entry.signal),
            consensus_confidence: consensus_entry.map(|entry| entry.confidence),
            prior_signal: graded.prior_signal,
            ras_tier: ras_tier(graded.ras.value()).to_string(),
            ras: graded.ras,
            roi_adjustment: roi_adjustment(inputs.roi_priors, prospect.position, band),
            success_probability: inputs.calibration.map(|model| {
                success_probability(
                    model,
                    scores.final_grade,
                    prospect.position,
                    calibrated_ras(&graded.ras),
                )
            }),
            best_team: best_fit.map(|(team, _)| team.to_string()),
            best_team_fit: best_fit.map(|(_, fit)| fit),
            scores,
            comps,
        });
    }

    rank_entries(&mut entries);
    let mut qa = QaReport::new(STAGE);
    qa.finish(inputs.prospects.len(), entries.len());
    info!(
        rows = entries.len(),
        consensus_players = consensus.len(),
        consensus_exact = joins.consensus_exact,
        consensus_fuzzy = joins.consensus_fuzzy,
        combine = joins.combine,
        production = joins.production,
        duration_ms = start.elapsed().as_millis() as u64,
        status = %qa.status,
        "board built"
    );
    Ok(BoardBuild {
        entries,
        consensus,
        joins,
        qa,
    })
}

/// Only official RAS moves the calibrated probability; proxies add nothing.
fn calibrated_ras(ras: &MetricValue) -> Option<f64> {
    ras.is_verified().then(|| ras.value())
}

/// Orders by final grade descending, then player id, and assigns 1-based
/// board ranks.
pub fn rank_entries(entries: &mut [BoardEntry]) {
    entries.sort_by(|a, b| {
        b.final_grade()
            .total_cmp(&a.final_grade())
            .then_with(|| a.player_id().cmp(b.player_id()))
    });
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.board_rank = idx as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use draft_model::{Position, ProxyDerivation};

    use super::*;

    fn model() -> CalibrationModel {
        CalibrationModel {
            intercept: -9.0,
            slope: 0.11,
            position_additive: BTreeMap::new(),
            sample_size: 10,
            weighted_sample_size: 10.0,
            snapshot_grades: 0,
            proxy_grades: 10,
            weighted_success_rate: 0.5,
        }
    }

    #[test]
    fn proxy_ras_adds_no_probability_delta() {
        let model = model();
        let proxy = MetricValue::proxy(9.5, ProxyDerivation::CombineDrills);
        assert_eq!(calibrated_ras(&proxy), None);

        let without = success_probability(&model, 85.0, Position::Wr, None);
        let with_proxy = success_probability(&model, 85.0, Position::Wr, calibrated_ras(&proxy));
        assert_eq!(with_proxy, without);
    }

    #[test]
    fn official_ras_shifts_probability() {
        let model = model();
        let official = MetricValue::Verified(9.5);
        assert_eq!(calibrated_ras(&official), Some(9.5));

        let without = success_probability(&model, 85.0, Position::Wr, None);
        let with_ras = success_probability(&model, 85.0, Position::Wr, calibrated_ras(&official));
        assert!((with_ras - without - 0.0375).abs() < 1e-12);
    }
}
