//! Leakage guard for current-class scoring features.
//!
//! Historical outcomes are only ever labels. A board input table that carries
//! one of [`OUTCOME_COLUMNS`] is rejected before any row is scored.

use thiserror::Error;
use tracing::{debug, error};

use crate::util::CaseInsensitiveSet;

/// Post-draft outcome columns. Never a scoring feature.
pub const OUTCOME_COLUMNS: &[&str] = &[
    "wav",
    "w_av",
    "car_av",
    "games",
    "starts",
    "ap1",
    "pb",
    "predicted_value",
    "pred_value",
    "overall_pick",
    "draft_round",
    "years_in_career",
    "to_year",
    "surplus_value",
    "success_label_3yr",
    "starter_label_3yr",
    "ceiling_label",
    "starter_seasons_proxy",
    "second_contract_proxy",
    "censor_weight",
];

/// Columns the board builder may read from its input tables.
pub const BOARD_FEATURE_COLUMNS: &[&str] = &[
    // prospects_seed
    "player_id",
    "player_name",
    "school",
    "position",
    "class_year",
    "draft_year",
    "rank_seed",
    "height_in",
    "weight_lb",
    "injury_flag",
    "role_ambiguous",
    // consensus
    "source",
    "rank",
    "score",
    "fetched_at",
    "url",
    // combine
    "forty",
    "ten_split",
    "vertical",
    "broad",
    "shuttle",
    "three_cone",
    "bench",
    "ras_official",
    // production
    "season",
    "production_score",
    "college_games",
    // team needs
    "team",
    "need_1",
    "need_2",
    "need_3",
    "off_scheme",
    "def_scheme",
    "gm_profile",
];

/// A board input table carried historical outcome columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("leakage: table `{table}` carries outcome columns [{}]", columns.join(", "))]
pub struct LeakageViolation {
    pub table: String,
    pub columns: Vec<String>,
}

pub fn is_outcome_column(name: &str) -> bool {
    let outcomes: CaseInsensitiveSet = OUTCOME_COLUMNS.iter().collect();
    outcomes.contains(name)
}

/// Checks a board input table's columns and returns the ones usable as
/// features (allow-listed, original spelling kept).
///
/// Any outcome column fails the whole table. Columns on neither list are
/// ignored.
pub fn check_feature_columns<S: AsRef<str>>(
    table: &str,
    columns: &[S],
) -> Result<Vec<String>, LeakageViolation> {
    let outcomes: CaseInsensitiveSet = OUTCOME_COLUMNS.iter().collect();
    let allowed: CaseInsensitiveSet = BOARD_FEATURE_COLUMNS.iter().collect();

    let leaked: Vec<String> = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| outcomes.contains(name))
        .map(str::to_string)
        .collect();
    if !leaked.is_empty() {
        error!(table, columns = ?leaked, "outcome columns in board input");
        return Err(LeakageViolation {
            table: table.to_string(),
            columns: leaked,
        });
    }

    let features: Vec<String> = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| allowed.contains(name))
        .map(str::to_string)
        .collect();
    debug!(table, features = features.len(), "feature columns accepted");
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_and_deny_lists_are_disjoint() {
        let outcomes: CaseInsensitiveSet = OUTCOME_COLUMNS.iter().collect();
        let overlap: Vec<&str> = BOARD_FEATURE_COLUMNS
            .iter()
            .copied()
            .filter(|name| outcomes.contains(name))
            .collect();
        assert!(overlap.is_empty(), "overlap: {overlap:?}");
    }

    #[test]
    fn outcome_column_fails_table() {
        let err = check_feature_columns("combine", &["player_name", "forty", "W_AV"]).unwrap_err();
        assert_eq!(err.table, "combine");
        assert_eq!(err.columns, vec!["W_AV".to_string()]);
        assert!(err.to_string().contains("W_AV"));
    }

    #[test]
    fn unknown_columns_are_not_features() {
        let features =
            check_feature_columns("production", &["player_name", "notes", "production_score"])
                .unwrap();
        assert_eq!(features, vec!["player_name", "production_score"]);
    }

    #[test]
    fn outcome_lookup_is_case_insensitive() {
        assert!(is_outcome_column("Surplus_Value"));
        assert!(!is_outcome_column("college_games"));
    }
}
