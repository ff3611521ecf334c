//! Composite grade blend.
//!
//! `grade = Σ weight × component - risk`, with position weights from the
//! standards. Components fall back to rank-derived proxies when a prospect
//! has no measured input, and the proxy provenance is carried on the
//! [`MetricValue`] fields of [`ProspectScores`].

use draft_model::{
    ClassYear, CombineRecord, MetricValue, Position, ProductionRecord, Prospect, ProspectScores,
    ProxyDerivation,
};
use draft_standards::{GradingStandards, RoundBucket, SizeThreshold};

use crate::consensus::{ConsensusEntry, prior_signal};
use crate::error::{Result, TransformError};
use crate::ras::{combine_ras, estimate_ras, resolve_ras};

pub const UDFA: &str = "UDFA";

/// Everything known about one prospect going into the blend.
#[derive(Debug, Clone, Copy)]
pub struct GradeInputs<'a> {
    pub prospect: &'a Prospect,
    pub consensus: Option<&'a ConsensusEntry>,
    pub combine: Option<&'a CombineRecord>,
    pub production: Option<&'a ProductionRecord>,
}

/// Blend output plus the side signals the board reports.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedProspect {
    pub scores: ProspectScores,
    pub prior_signal: f64,
    pub ras: MetricValue,
}

/// Frame score against the position minimums.
///
/// Missing measurements are scored at the minimum.
pub fn size_score(threshold: SizeThreshold, height_in: Option<u32>, weight_lb: Option<u32>) -> f64 {
    let min_h = f64::from(threshold.min_height_in);
    let min_w = f64::from(threshold.min_weight_lb);
    let h = height_in.map_or(min_h, f64::from);
    let w = weight_lb.map_or(min_w, f64::from);

    let h_below = (min_h - h).max(0.0);
    let h_above = (h - (min_h + 4.0)).max(0.0);
    let w_below = (min_w - w).max(0.0);
    let w_above = (w - (min_w + 35.0)).max(0.0);
    let penalty = 1.5 * h_below + 0.35 * h_above + 0.12 * w_below + 0.02 * w_above;
    (90.0 - penalty).clamp(62.0, 95.0)
}

fn frame_modifier(position: Position) -> f64 {
    match position {
        Position::Qb => 1.5,
        Position::Rb => 0.8,
        Position::Wr => 1.0,
        Position::Te => 0.9,
        Position::Ot => 0.7,
        Position::Iol => 0.4,
        Position::Edge => 1.2,
        Position::Dt => 0.8,
        Position::Lb => 1.0,
        Position::Cb => 1.1,
        Position::S => 1.0,
    }
}

/// Athletic score from rank and frame when nothing was tested.
pub fn athletic_rank_frame(
    position: Position,
    rank: u32,
    threshold: SizeThreshold,
    height_in: Option<u32>,
    weight_lb: Option<u32>,
) -> f64 {
    let base = 90.0 - 0.09 * f64::from(rank);
    let height_bonus = height_in.map_or(0.0, |h| {
        (f64::from(h) - f64::from(threshold.min_height_in)) * 0.28
    });
    let weight_bonus = weight_lb.map_or(0.0, |w| {
        (f64::from(w) - f64::from(threshold.min_weight_lb)) * 0.008
    });
    (base + (height_bonus + weight_bonus) * frame_modifier(position)).clamp(60.0, 95.0)
}

/// Maps a 0-10 RAS onto the athletic component scale (`ras * 10`).
pub fn athletic_from_ras(ras: f64) -> f64 {
    (ras * 10.0).clamp(60.0, 95.0)
}

pub fn trait_proxy(position: Position, rank: u32) -> f64 {
    let bonus = match position {
        Position::Qb => 1.8,
        Position::Ot => 1.2,
        Position::Edge => 1.0,
        Position::Cb => 0.9,
        Position::Wr => 0.8,
        _ => 0.5,
    };
    (95.0 - 0.085 * f64::from(rank) + bonus).clamp(60.0, 97.0)
}

pub fn production_proxy(class_year: ClassYear, rank: u32) -> f64 {
    let experience = if class_year.is_senior() {
        1.2
    } else if matches!(class_year, ClassYear::So | ClassYear::Rso) {
        0.2
    } else {
        0.5
    };
    (92.0 - 0.08 * f64::from(rank) + experience).clamp(58.0, 95.0)
}

pub fn context_score(rank: u32) -> f64 {
    (90.0 - 0.07 * f64::from(rank)).clamp(62.0, 93.0)
}

pub fn risk_penalty(class_year: ClassYear, rank: u32, injury: bool, small_sample: bool) -> f64 {
    let early_entry = if class_year.is_early_entry() { 1.8 } else { 0.9 };
    let uncertainty = if rank > 180 { 1.4 } else { 0.6 };
    early_entry + uncertainty + flag(injury) + 0.5 * flag(small_sample)
}

/// Round label for a grade. The first bucket whose threshold the grade meets
/// wins; `round_map` is ordered from the highest threshold down.
pub fn round_projection(grade: f64, round_map: &[RoundBucket]) -> &str {
    round_map
        .iter()
        .find(|bucket| grade >= bucket.min_grade)
        .map_or(UDFA, |bucket| bucket.label.as_str())
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Grades one prospect.
pub fn grade_prospect(inputs: GradeInputs<'_>, standards: &GradingStandards) -> Result<GradedProspect> {
    let prospect = inputs.prospect;
    let position = prospect.position;
    let rank = prospect.rank_seed;
    let weights = standards
        .weights_for(position)
        .ok_or(TransformError::MissingStandard {
            table: "grading.weights",
            position,
        })?;
    let threshold = standards
        .threshold_for(position)
        .ok_or(TransformError::MissingStandard {
            table: "thresholds",
            position,
        })?;
    let section = &standards.grading;

    let prior = prior_signal(rank, inputs.consensus, standards.consensus.base_weight);
    let prior_weight = section.trait_prior_weight
        * inputs
            .consensus
            .map_or(section.seed_only_prior_factor, |entry| entry.confidence);
    let trait_score = (1.0 - prior_weight) * trait_proxy(position, rank) + prior_weight * prior;

    let production = match inputs.production {
        Some(record) => MetricValue::Verified(record.production_score.clamp(0.0, 100.0)),
        None => MetricValue::proxy(
            production_proxy(prospect.class_year, rank),
            ProxyDerivation::RankFrame,
        ),
    };

    let rank_frame = athletic_rank_frame(
        position,
        rank,
        threshold,
        prospect.height_in,
        prospect.weight_lb,
    );
    let athletic = match inputs.combine {
        Some(CombineRecord {
            ras_official: Some(official),
            ..
        }) => MetricValue::Verified(athletic_from_ras(*official)),
        Some(record) => match combine_ras(position, record) {
            Some(ras) => MetricValue::proxy(athletic_from_ras(ras), ProxyDerivation::CombineDrills),
            None => MetricValue::proxy(rank_frame, ProxyDerivation::RankFrame),
        },
        None => MetricValue::proxy(rank_frame, ProxyDerivation::RankFrame),
    };

    let profile_estimate = estimate_ras(
        position,
        prospect.height_in.map(f64::from),
        prospect.weight_lb.map(f64::from),
        rank_frame,
        rank,
    );
    let ras = resolve_ras(position, inputs.combine, profile_estimate);

    let size = size_score(threshold, prospect.height_in, prospect.weight_lb);
    let context = context_score(rank);
    let small_sample = inputs
        .production
        .is_some_and(ProductionRecord::is_small_sample);
    let risk = risk_penalty(prospect.class_year, rank, prospect.injury_flag, small_sample);

    let blended = weights.trait_weight * trait_score
        + weights.production * production.value()
        + weights.athletic * athletic.value()
        + weights.size * size
        + weights.context * context
        - risk;
    let final_grade = blended.clamp(section.grade_min, section.grade_max);

    let volatility = 0.6 * flag(small_sample)
        + 0.5 * flag(prospect.role_ambiguous)
        + 1.2 * flag(prospect.injury_flag)
        + 0.5 * risk;
    let elite_verified = ras.is_verified() && ras.value() >= 9.0;
    let upside =
        1.5 + 0.7 * flag(prospect.class_year.is_underclass()) + 0.4 * flag(elite_verified);

    let scores = ProspectScores {
        trait_score,
        production,
        athletic,
        size_score: size,
        context_score: context,
        risk_penalty: risk,
        final_grade,
        floor_grade: (final_grade - volatility.max(1.5)).clamp(section.grade_min, section.grade_max),
        ceiling_grade: (final_grade + upside).clamp(section.grade_min, section.grade_max),
        round_projection: round_projection(final_grade, &standards.round_map).to_string(),
    };
    Ok(GradedProspect {
        scores,
        prior_signal: prior,
        ras,
    })
}
