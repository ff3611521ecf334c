//! One markdown report per pipeline stage.

use chrono::{DateTime, Utc};

use draft_model::{BoardEntry, QaReport, RoiPrior};
use draft_standards::CensorTable;
use draft_transform::{CalibrationOutput, JoinStats, LabelSummary, MockDraft};

use crate::markdown::{Markdown, fmt_opt, fmt_pct};

/// Appends the QA section shared by every stage.
pub fn qa_section(doc: &mut Markdown, qa: &QaReport) {
    doc.heading(2, "QA");
    doc.facts(&[
        ("status", qa.status.to_string()),
        ("rows in", qa.rows_in.to_string()),
        ("rows out", qa.rows_out.to_string()),
        ("dropped", qa.dropped().to_string()),
        ("warnings", qa.warning_count().to_string()),
    ]);
    if qa.counts.is_empty() {
        return;
    }
    let counts: Vec<Vec<String>> = qa
        .counts
        .iter()
        .map(|(kind, count)| {
            vec![
                kind.to_string(),
                count.to_string(),
                if kind.drops_row() { "dropped" } else { "kept" }.to_string(),
            ]
        })
        .collect();
    doc.table(&["issue", "rows", "effect"], &counts);

    let samples: Vec<Vec<String>> = qa
        .samples
        .iter()
        .map(|issue| {
            vec![
                issue.kind.to_string(),
                issue.row.map_or_else(|| "-".to_string(), |row| row.to_string()),
                issue.field.clone().unwrap_or_else(|| "-".to_string()),
                issue.message.clone(),
            ]
        })
        .collect();
    doc.heading(3, "Samples");
    doc.table(&["issue", "row", "field", "message"], &samples);
}

/// Report for a stage that only normalizes rows (seed and ingesters).
pub fn stage_report(title: &str, output: &str, qa: &QaReport, at: DateTime<Utc>) -> String {
    let mut doc = Markdown::new(title);
    doc.generated(at);
    doc.facts(&[("output", output)]);
    qa_section(&mut doc, qa);
    doc.finish()
}

pub fn label_report(
    summary: &LabelSummary,
    censor: &CensorTable,
    qa: &QaReport,
    at: DateTime<Utc>,
) -> String {
    let mut doc = Markdown::new("Historical labels");
    doc.generated(at);
    doc.facts(&[
        ("rows", summary.rows.to_string()),
        ("weighted rows", format!("{:.2}", summary.weighted_rows)),
    ]);

    doc.heading(2, "Label rates");
    let rates: Vec<Vec<String>> = summary
        .rates
        .iter()
        .map(|rate| {
            vec![
                rate.label.to_string(),
                fmt_pct(rate.unweighted),
                fmt_pct(rate.weighted),
            ]
        })
        .collect();
    doc.table(&["label", "unweighted", "censor-weighted"], &rates);

    doc.heading(2, "Censor weights");
    let years: Vec<Vec<String>> = summary
        .years
        .iter()
        .map(|year| {
            vec![
                year.draft_year.to_string(),
                year.rows.to_string(),
                format!("{:.2}", year.censor_weight),
            ]
        })
        .collect();
    doc.table(&["draft year", "rows", "weight"], &years);
    doc.paragraph(&format!(
        "Years before the first step weigh {:.2}; {} and later are immature at {:.2}.",
        censor.default_weight, censor.immature_from, censor.immature_weight
    ));

    qa_section(&mut doc, qa);
    doc.finish()
}

pub fn calibration_report(
    output: &CalibrationOutput,
    priors: &[RoiPrior],
    at: DateTime<Utc>,
) -> String {
    let model = &output.model;
    let mut doc = Markdown::new("Calibration");
    doc.generated(at);
    doc.facts(&[
        ("intercept", format!("{:.4}", model.intercept)),
        ("slope", format!("{:.4}", model.slope)),
        ("rows", model.sample_size.to_string()),
        ("weighted rows", format!("{:.2}", model.weighted_sample_size)),
        ("snapshot grades", model.snapshot_grades.to_string()),
        ("proxy grades", model.proxy_grades.to_string()),
        ("weighted success rate", fmt_pct(model.weighted_success_rate)),
    ]);

    if !model.position_additive.is_empty() {
        doc.heading(2, "Position additives");
        let rows: Vec<Vec<String>> = model
            .position_additive
            .iter()
            .map(|(position, delta)| vec![position.to_string(), format!("{delta:+.3}")])
            .collect();
        doc.table(&["position", "additive"], &rows);
    }

    doc.heading(2, "Grade bins");
    let bins: Vec<Vec<String>> = output
        .bins
        .iter()
        .map(|bin| {
            vec![
                bin.bin.to_string(),
                format!("{:.1}-{:.1}", bin.grade_min, bin.grade_max),
                bin.rows.to_string(),
                format!("{:.2}", bin.weighted_rows),
                fmt_pct(bin.hit_rate),
                format!("{:.2}", bin.mean_career_value),
            ]
        })
        .collect();
    doc.table(
        &["bin", "grades", "rows", "weighted", "hit rate", "mean wAV"],
        &bins,
    );

    doc.heading(2, "Year backtest");
    if output.backtest.is_empty() {
        doc.paragraph("No holdout year had enough earlier training rows.");
    } else {
        let rows: Vec<Vec<String>> = output
            .backtest
            .iter()
            .map(|row| {
                vec![
                    row.holdout_year.to_string(),
                    row.train_rows.to_string(),
                    row.test_rows.to_string(),
                    format!("{:.4}", row.brier),
                    fmt_pct(row.accuracy),
                    fmt_pct(row.mean_predicted),
                    fmt_pct(row.observed_rate),
                ]
            })
            .collect();
        doc.table(
            &[
                "holdout", "train", "test", "brier", "accuracy", "predicted", "observed",
            ],
            &rows,
        );
    }

    doc.heading(2, "ROI priors");
    let rows: Vec<Vec<String>> = priors
        .iter()
        .map(|prior| {
            vec![
                prior.pick_band.to_string(),
                prior.position.to_string(),
                prior.rows.to_string(),
                format!("{:.2}", prior.mean_surplus),
                fmt_pct(prior.success_rate),
                format!("{:+.2}", prior.surplus_z),
                format!("{:+.2}", prior.roi_grade_adjustment),
            ]
        })
        .collect();
    doc.table(
        &[
            "band", "position", "rows", "surplus", "success", "z", "adjustment",
        ],
        &rows,
    );
    doc.finish()
}

/// Board summary with the top `top_n` entries.
pub fn board_report(
    entries: &[BoardEntry],
    joins: &JoinStats,
    qa: &QaReport,
    top_n: usize,
    at: DateTime<Utc>,
) -> String {
    let mut doc = Markdown::new("Big board");
    doc.generated(at);
    let verified_ras = entries.iter().filter(|entry| entry.ras.is_verified()).count();
    doc.facts(&[
        ("prospects", entries.len().to_string()),
        ("consensus exact joins", joins.consensus_exact.to_string()),
        ("consensus fuzzy joins", joins.consensus_fuzzy.to_string()),
        ("combine joins", joins.combine.to_string()),
        ("production joins", joins.production.to_string()),
        ("with comps", joins.with_comps.to_string()),
        ("verified RAS", verified_ras.to_string()),
    ]);

    doc.heading(2, &format!("Top {}", top_n.min(entries.len())));
    let rows: Vec<Vec<String>> = entries
        .iter()
        .take(top_n)
        .map(|entry| {
            vec![
                entry.board_rank.to_string(),
                entry.prospect.player_name.clone(),
                entry.prospect.position.to_string(),
                entry.prospect.school.clone(),
                format!("{:.2}", entry.final_grade()),
                entry.scores.round_projection.clone(),
                fmt_opt(entry.consensus_mean_rank),
                format!("{:.2} {}", entry.ras.value(), entry.ras_tier),
                entry.best_team.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    doc.table(
        &[
            "rank", "player", "pos", "school", "grade", "round", "consensus", "RAS", "best fit",
        ],
        &rows,
    );
    qa_section(&mut doc, qa);
    doc.finish()
}

pub fn mock_report(mock: &MockDraft, at: DateTime<Utc>) -> String {
    let mut doc = Markdown::new("Mock draft");
    doc.generated(at);
    let rounds = mock.picks.last().map_or(0, |pick| pick.round);
    doc.facts(&[
        ("picks", mock.picks.len().to_string()),
        ("rounds", rounds.to_string()),
        ("trade-down flags", mock.trade_flags.len().to_string()),
    ]);

    for round in 1..=rounds {
        doc.heading(2, &format!("Round {round}"));
        let rows: Vec<Vec<String>> = mock
            .picks
            .iter()
            .filter(|pick| pick.round == round)
            .map(|pick| {
                vec![
                    pick.overall_pick.to_string(),
                    pick.team.clone(),
                    pick.player_name.clone(),
                    pick.position.to_string(),
                    pick.board_rank.to_string(),
                    format!("{:.3}", pick.pick_score),
                    if pick.trade_down_flag { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();
        doc.table(
            &["pick", "team", "player", "pos", "board", "score", "trade down"],
            &rows,
        );
    }

    if !mock.trade_flags.is_empty() {
        doc.heading(2, "Trade-down flags");
        let rows: Vec<Vec<String>> = mock
            .trade_flags
            .iter()
            .map(|flag| vec![flag.overall_pick.to_string(), flag.team.clone(), flag.reason.clone()])
            .collect();
        doc.table(&["pick", "team", "reason"], &rows);
    }
    doc.finish()
}
