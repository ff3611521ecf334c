//! Greedy mock draft.
//!
//! At each slot every player in the candidate pool is scored as
//! `board_value·w1 + team_fit·w2 + run_pressure·w3 + scarcity·w4` and the best
//! score is taken. Ties go to the better board rank. A trade-down flag is
//! recorded when the guard conditions hold; it never changes the selection.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, info_span};

use draft_model::{BoardEntry, CompPick, DraftSlot, PickRecord, Position, TeamNeedProfile, TradeFlag};
use draft_standards::MockSettings;

use crate::error::{Result, TransformError};
use crate::team_fit::{need_score, team_fit};

const DEFAULT_RUN_PRESSURE: f64 = 0.15;

/// Output of one simulation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockDraft {
    pub picks: Vec<PickRecord>,
    pub trade_flags: Vec<TradeFlag>,
}

/// Expands the round-one order into `rounds` rounds. Compensatory picks are
/// inserted after `pick_after` regular picks of their round.
pub fn build_order(round_one: &[String], comp_picks: &[CompPick], rounds: u32) -> Vec<DraftSlot> {
    let mut slots = Vec::new();
    let mut overall = 0;
    for round in 1..=rounds {
        let mut order: Vec<(String, bool)> =
            round_one.iter().map(|team| (team.clone(), false)).collect();
        let mut extra: Vec<&CompPick> = comp_picks.iter().filter(|comp| comp.round == round).collect();
        extra.sort_by(|a, b| b.pick_after.cmp(&a.pick_after));
        for comp in extra {
            let idx = (comp.pick_after as usize).min(order.len());
            order.insert(idx, (comp.team.clone(), true));
        }
        for (idx, (team, compensatory)) in order.into_iter().enumerate() {
            overall += 1;
            slots.push(DraftSlot {
                round,
                pick_in_round: idx as u32 + 1,
                overall_pick: overall,
                team,
                compensatory,
            });
        }
    }
    slots
}

/// Board value on a 0.01-1.00 scale from board rank.
pub fn board_value(board_rank: u32) -> f64 {
    (101.0 - f64::from(board_rank)).max(1.0) / 100.0
}

/// Scarcity bonus from the number of same-position players near the top.
pub fn scarcity(remaining: &[&BoardEntry], position: Position, window: usize) -> f64 {
    let count = remaining
        .iter()
        .take(window)
        .filter(|entry| entry.prospect.position == position)
        .count();
    match count {
        0..=2 => 0.9,
        3..=4 => 0.6,
        5..=7 => 0.3,
        _ => 0.0,
    }
}

/// Per-position demand from the teams picking next. Each position seen in
/// the top `window` players gets the mean need score of `upcoming`.
pub fn run_pressure(
    remaining: &[&BoardEntry],
    upcoming: &[&TeamNeedProfile],
    window: usize,
) -> BTreeMap<Position, f64> {
    let mut pressure = BTreeMap::new();
    let teams = upcoming.len().max(1) as f64;
    for entry in remaining.iter().take(window) {
        let position = entry.prospect.position;
        let demand: f64 = upcoming.iter().map(|team| need_score(team, position)).sum::<f64>() / teams;
        let slot = pressure.entry(position).or_insert(0.0_f64);
        *slot = slot.max(demand);
    }
    pressure
}

struct Simulation<'a> {
    settings: &'a MockSettings,
    teams: HashMap<&'a str, &'a TeamNeedProfile>,
    fallback: TeamNeedProfile,
}

impl Simulation<'_> {
    fn team(&self, name: &str) -> &TeamNeedProfile {
        self.teams.get(name).copied().unwrap_or(&self.fallback)
    }

    fn trade_flag(
        &self,
        slot: &DraftSlot,
        remaining: &[&BoardEntry],
        later: &[&DraftSlot],
    ) -> Option<TradeFlag> {
        let settings = self.settings;
        let top_need = self.team(&slot.team).top_need()?;
        let in_tier = remaining
            .iter()
            .take(settings.trade_tier)
            .any(|entry| entry.prospect.position == top_need);
        if in_tier {
            return None;
        }

        let best_grade = remaining
            .iter()
            .take(settings.candidate_pool)
            .map(|entry| entry.final_grade())
            .fold(f64::NEG_INFINITY, f64::max);
        let similar_players = remaining
            .iter()
            .filter(|entry| best_grade - entry.final_grade() <= settings.trade_grade_band)
            .count();
        let window = later.len().min(settings.trade_window);
        if similar_players.saturating_sub(window) < settings.trade_min_survivors {
            return None;
        }

        let scarcity_teams: Vec<String> = later
            .iter()
            .take(settings.trade_window)
            .filter(|later_slot| {
                self.team(&later_slot.team).top_need().is_some_and(|need| {
                    scarcity(remaining, need, settings.scarcity_window)
                        >= settings.trade_scarcity_signal
                })
            })
            .map(|later_slot| later_slot.team.clone())
            .collect();
        if scarcity_teams.is_empty() {
            return None;
        }

        Some(TradeFlag {
            round: slot.round,
            pick_in_round: slot.pick_in_round,
            overall_pick: slot.overall_pick,
            team: slot.team.clone(),
            top_need: Some(top_need),
            similar_players,
            reason: format!(
                "no {top_need} in the top {}; {similar_players} players within {:.1} grade points; \
                 scarce need behind for {}",
                settings.trade_tier,
                settings.trade_grade_band,
                scarcity_teams.join(", ")
            ),
            scarcity_teams,
        })
    }
}

/// Runs the draft over `order`. The board is consumed in board-rank order;
/// teams missing from `teams` are scored with a neutral profile.
pub fn simulate(
    board: &[BoardEntry],
    teams: &[TeamNeedProfile],
    order: &[DraftSlot],
    settings: &MockSettings,
) -> Result<MockDraft> {
    let _span = info_span!("mock", slots = order.len(), board = board.len()).entered();
    if settings.candidate_pool == 0 {
        return Err(TransformError::Message(
            "mock candidate pool must be positive".to_string(),
        ));
    }

    let simulation = Simulation {
        settings,
        teams: teams.iter().map(|team| (team.team.as_str(), team)).collect(),
        fallback: TeamNeedProfile::neutral(""),
    };

    let mut remaining: Vec<&BoardEntry> = board.iter().collect();
    remaining.sort_by(|a, b| {
        a.board_rank
            .cmp(&b.board_rank)
            .then_with(|| a.player_id().cmp(b.player_id()))
    });

    let mut result = MockDraft::default();
    for (idx, slot) in order.iter().enumerate() {
        if remaining.is_empty() {
            debug!(overall_pick = slot.overall_pick, "board exhausted");
            break;
        }
        let team = simulation.team(&slot.team);
        let later: Vec<&DraftSlot> = order[idx + 1..].iter().collect();
        let upcoming: Vec<&TeamNeedProfile> = later
            .iter()
            .take(settings.run_teams)
            .map(|later_slot| simulation.team(&later_slot.team))
            .collect();
        let pressure = run_pressure(&remaining, &upcoming, settings.run_window);
        let flag = simulation.trade_flag(slot, &remaining, &later);

        let mut best: Option<(usize, f64, f64, f64, f64, f64)> = None;
        for (candidate_idx, entry) in remaining.iter().take(settings.candidate_pool).enumerate() {
            let position = entry.prospect.position;
            let value = board_value(entry.board_rank);
            let fit = team_fit(team, position);
            let run = pressure
                .get(&position)
                .copied()
                .unwrap_or(DEFAULT_RUN_PRESSURE)
                .min(1.0);
            let scarce = scarcity(&remaining, position, settings.scarcity_window);
            let score = settings.board_value * value
                + settings.team_fit * fit
                + settings.run_pressure * run
                + settings.scarcity * scarce;
            if best.is_none_or(|(_, best_score, ..)| score > best_score) {
                best = Some((candidate_idx, score, value, fit, run, scarce));
            }
        }
        let Some((chosen, pick_score, value, fit, run, scarce)) = best else {
            break;
        };
        let entry = remaining.remove(chosen);

        result.picks.push(PickRecord {
            round: slot.round,
            pick_in_round: slot.pick_in_round,
            overall_pick: slot.overall_pick,
            team: slot.team.clone(),
            player_id: entry.player_id().to_string(),
            player_name: entry.prospect.player_name.clone(),
            position: entry.prospect.position,
            school: entry.prospect.school.clone(),
            board_rank: entry.board_rank,
            final_grade: entry.final_grade(),
            round_projection: entry.scores.round_projection.clone(),
            pick_score,
            board_value: value,
            team_fit: fit,
            run_pressure: run,
            scarcity: scarce,
            trade_down_flag: flag.is_some(),
        });
        if let Some(flag) = flag {
            result.trade_flags.push(flag);
        }
    }

    info!(
        picks = result.picks.len(),
        trade_flags = result.trade_flags.len(),
        "mock draft simulated"
    );
    Ok(result)
}
