//! Nearest-neighbour historical comps.
//!
//! Features are z-scored against the historical pool of the same position.
//! Distance is a weighted L1 over the features both players have, normalized
//! by the weight of those features. A group's weight is split evenly across
//! its features.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, info_span};

use draft_model::{
    CombineRecord, CompFeature, CompGroup, CompMatch, CompProfile, CompTier, Position, Prospect,
};
use draft_standards::CompSettings;

const MIN_SPREAD: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct FeatureStats {
    mean: f64,
    std: f64,
}

/// Comp pool indexed by position with per-position feature statistics.
#[derive(Debug, Clone)]
pub struct CompEngine {
    settings: CompSettings,
    pool: BTreeMap<Position, Vec<CompProfile>>,
    stats: BTreeMap<(Position, CompFeature), FeatureStats>,
}

impl CompEngine {
    pub fn new(pool: Vec<CompProfile>, settings: CompSettings) -> Self {
        let mut by_position: BTreeMap<Position, Vec<CompProfile>> = BTreeMap::new();
        for profile in pool {
            by_position.entry(profile.position).or_default().push(profile);
        }

        let mut stats = BTreeMap::new();
        for (position, profiles) in &by_position {
            for feature in CompFeature::ALL {
                let values: Vec<f64> = profiles
                    .iter()
                    .filter_map(|profile| profile.feature(feature))
                    .collect();
                if values.is_empty() {
                    continue;
                }
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                stats.insert(
                    (*position, feature),
                    FeatureStats {
                        mean,
                        std: variance.sqrt(),
                    },
                );
            }
        }
        Self {
            settings,
            pool: by_position,
            stats,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.values().map(Vec::len).sum()
    }

    fn feature_weight(&self, feature: CompFeature) -> f64 {
        let weights = self.settings.group_weights;
        let group = feature.group();
        let group_weight = match group {
            CompGroup::Size => weights.size,
            CompGroup::Athletic => weights.athletic,
            CompGroup::Production => weights.production,
            CompGroup::Trait => weights.trait_weight,
        };
        group_weight / group.size() as f64
    }

    fn z(&self, position: Position, feature: CompFeature, value: f64) -> Option<f64> {
        let stats = self.stats.get(&(position, feature))?;
        if stats.std <= MIN_SPREAD {
            return None;
        }
        Some((value - stats.mean) / stats.std)
    }

    /// Distance and overlap between two profiles of the same position, or
    /// `None` when fewer than `min_overlap` features are shared.
    pub fn distance(&self, a: &CompProfile, b: &CompProfile) -> Option<(f64, usize)> {
        let mut weighted = 0.0;
        let mut weight_used = 0.0;
        let mut overlap = 0;
        for feature in CompFeature::ALL {
            let (Some(va), Some(vb)) = (a.feature(feature), b.feature(feature)) else {
                continue;
            };
            let (Some(za), Some(zb)) = (
                self.z(a.position, feature, va),
                self.z(a.position, feature, vb),
            ) else {
                continue;
            };
            let weight = self.feature_weight(feature);
            weighted += weight * (za - zb).abs();
            weight_used += weight;
            overlap += 1;
        }
        if overlap < self.settings.min_overlap || weight_used <= 0.0 {
            return None;
        }
        Some((weighted / weight_used, overlap))
    }

    pub fn tier(&self, distance: f64) -> CompTier {
        if distance <= self.settings.tier_a {
            CompTier::A
        } else if distance <= self.settings.tier_b {
            CompTier::B
        } else {
            CompTier::C
        }
    }

    /// Top-k comps for a profile. Equal distances order by larger overlap,
    /// then ascending player id.
    pub fn find(&self, profile: &CompProfile) -> Vec<CompMatch> {
        let Some(candidates) = self.pool.get(&profile.position) else {
            return Vec::new();
        };
        let mut scored: Vec<(f64, usize, &CompProfile)> = candidates
            .iter()
            .filter(|candidate| candidate.player_id != profile.player_id)
            .filter_map(|candidate| {
                self.distance(profile, candidate)
                    .map(|(distance, overlap)| (distance, overlap, candidate))
            })
            .collect();
        scored.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.player_id.cmp(&b.2.player_id))
        });
        scored
            .into_iter()
            .take(self.settings.k)
            .map(|(distance, overlap, candidate)| CompMatch {
                player_id: candidate.player_id.clone(),
                player_name: candidate.player_name.clone(),
                draft_year: candidate.draft_year,
                distance,
                overlap,
                tier: self.tier(distance),
            })
            .collect()
    }

    /// Comps for every profile, keyed by player id.
    pub fn find_all(&self, profiles: &[CompProfile]) -> BTreeMap<String, Vec<CompMatch>> {
        let _span = info_span!("comps", prospects = profiles.len(), pool = self.pool_size())
            .entered();
        let out: BTreeMap<String, Vec<CompMatch>> = profiles
            .iter()
            .map(|profile| (profile.player_id.clone(), self.find(profile)))
            .collect();
        debug!(
            matched = out.values().filter(|comps| !comps.is_empty()).count(),
            "comps computed"
        );
        out
    }
}

/// Comparison profile of a current prospect.
pub fn prospect_profile(
    prospect: &Prospect,
    combine: Option<&CombineRecord>,
    production_score: f64,
    trait_score: f64,
) -> CompProfile {
    let mut features = BTreeMap::new();
    let height = combine
        .and_then(|record| record.height_in)
        .or(prospect.height_in.map(f64::from));
    let weight = combine
        .and_then(|record| record.weight_lb)
        .or(prospect.weight_lb.map(f64::from));
    let drills = combine.map_or([None; 5], |record| {
        [
            record.forty,
            record.vertical,
            record.broad,
            record.shuttle,
            record.three_cone,
        ]
    });
    let measured = [
        (CompFeature::Height, height),
        (CompFeature::Weight, weight),
        (CompFeature::Forty, drills[0]),
        (CompFeature::Vertical, drills[1]),
        (CompFeature::Broad, drills[2]),
        (CompFeature::Shuttle, drills[3]),
        (CompFeature::ThreeCone, drills[4]),
        (CompFeature::Production, Some(production_score)),
        (CompFeature::Trait, Some(trait_score)),
    ];
    for (feature, value) in measured {
        if let Some(value) = value {
            features.insert(feature, value);
        }
    }
    CompProfile {
        player_id: prospect.player_id.clone(),
        player_name: prospect.player_name.clone(),
        position: prospect.position,
        draft_year: Some(prospect.draft_year),
        features,
    }
}
