//! Tests for cross-module model behavior.

use draft_model::{
    MetricValue, Position, PositionAliases, ProxyDerivation, QaIssue, QaKind, QaReport,
    StageStatus, canonical_player_name, player_id,
};

#[test]
fn ids_ignore_source_spelling() {
    let aliases = {
        let mut aliases = PositionAliases::identity();
        aliases.insert("SAF", Position::S);
        aliases
    };
    let from_board = player_id(
        "Caleb Downs",
        aliases.resolve("SAF").unwrap(),
        "Ohio State",
    );
    let from_seed = player_id("caleb downs", aliases.resolve("s").unwrap(), "Ohio State");
    assert_eq!(from_board, from_seed);
    assert_eq!(canonical_player_name("Caleb Downs"), "caleb downs");
}

#[test]
fn metric_provenance_survives_json() {
    let values = vec![
        MetricValue::Verified(9.4),
        MetricValue::proxy(6.8, ProxyDerivation::ProfileEstimate),
    ];
    let json = serde_json::to_string(&values).unwrap();
    let back: Vec<MetricValue> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, values);
}

#[test]
fn qa_report_serializes_kind_keys() {
    let mut report = QaReport::new("consensus");
    report.record(QaIssue::new(QaKind::InvalidRank, "rank -1").at_row(4));
    report.finish(3, 2);
    assert_eq!(report.status, StageStatus::Partial);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["counts"]["invalid_rank"], 1);
    assert_eq!(json["status"], "partial");
}
