//! Historical draft outcomes, labels and comp profiles.
//!
//! Nothing in this module may feed a current-class grade. Outcome columns are
//! listed in the validate crate's leakage deny-list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::position::Position;

/// Raw historical draft row as ingested. The position is still the source
/// spelling and the draft year may be missing; the labeler resolves both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub draft_year: Option<i32>,
    pub overall_pick: u32,
    pub draft_round: u32,
    pub player_name: String,
    pub position_raw: String,
    pub school: String,
    pub wav: f64,
    pub games: f64,
    pub starts: f64,
    pub ap1: f64,
    pub pb: f64,
    pub years_in_career: f64,
    pub to_year: Option<i32>,
    pub predicted_value: Option<f64>,
}

/// A historical row with derived labels and censor weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledOutcome {
    pub draft_year: i32,
    pub overall_pick: u32,
    pub draft_round: u32,
    pub player_name: String,
    pub position: Position,
    pub school: String,
    pub wav: f64,
    pub games: f64,
    pub starts: f64,
    pub ap1: f64,
    pub pb: f64,
    pub years_in_career: f64,
    pub to_year: Option<i32>,
    pub predicted_value: Option<f64>,
    pub success_label_3yr: bool,
    pub starter_label_3yr: bool,
    pub ceiling_label: bool,
    pub starter_seasons_proxy: u32,
    pub second_contract_proxy: bool,
    pub surplus_value: Option<f64>,
    pub censor_weight: f64,
}

/// Standardized comparison features, grouped for weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompFeature {
    Height,
    Weight,
    Forty,
    Vertical,
    Broad,
    Shuttle,
    ThreeCone,
    Production,
    Trait,
}

/// Feature group used for comp distance weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompGroup {
    Size,
    Athletic,
    Production,
    Trait,
}

impl CompFeature {
    pub const ALL: [CompFeature; 9] = [
        CompFeature::Height,
        CompFeature::Weight,
        CompFeature::Forty,
        CompFeature::Vertical,
        CompFeature::Broad,
        CompFeature::Shuttle,
        CompFeature::ThreeCone,
        CompFeature::Production,
        CompFeature::Trait,
    ];

    /// Column name in profile tables.
    pub fn column(&self) -> &'static str {
        match self {
            CompFeature::Height => "height_in",
            CompFeature::Weight => "weight_lb",
            CompFeature::Forty => "forty",
            CompFeature::Vertical => "vertical",
            CompFeature::Broad => "broad",
            CompFeature::Shuttle => "shuttle",
            CompFeature::ThreeCone => "three_cone",
            CompFeature::Production => "production_score",
            CompFeature::Trait => "trait_score",
        }
    }

    pub fn group(&self) -> CompGroup {
        match self {
            CompFeature::Height | CompFeature::Weight => CompGroup::Size,
            CompFeature::Forty
            | CompFeature::Vertical
            | CompFeature::Broad
            | CompFeature::Shuttle
            | CompFeature::ThreeCone => CompGroup::Athletic,
            CompFeature::Production => CompGroup::Production,
            CompFeature::Trait => CompGroup::Trait,
        }
    }
}

impl CompGroup {
    /// Number of features in the group.
    pub fn size(&self) -> usize {
        CompFeature::ALL
            .iter()
            .filter(|feature| feature.group() == *self)
            .count()
    }
}

impl fmt::Display for CompFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Feature profile of a player for nearest-neighbour comps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompProfile {
    pub player_id: String,
    pub player_name: String,
    pub position: Position,
    pub draft_year: Option<i32>,
    pub features: BTreeMap<CompFeature, f64>,
}

impl CompProfile {
    pub fn feature(&self, feature: CompFeature) -> Option<f64> {
        self.features.get(&feature).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_partition_features() {
        let total: usize = [
            CompGroup::Size,
            CompGroup::Athletic,
            CompGroup::Production,
            CompGroup::Trait,
        ]
        .iter()
        .map(CompGroup::size)
        .sum();
        assert_eq!(total, CompFeature::ALL.len());
        assert_eq!(CompGroup::Athletic.size(), 5);
    }
}
