//! Team fit from needs, scheme and front-office tendency.
//!
//! Fit only feeds the mock draft and the board's best-fit column. It never
//! touches the intrinsic grade.

use draft_model::{Position, TeamNeedProfile};

const NEED_WEIGHT: f64 = 0.50;
const SCHEME_WEIGHT: f64 = 0.25;
const NEUTRAL_WEIGHT: f64 = 0.15;
const NEUTRAL_SCORE: f64 = 0.75;
const GM_WEIGHT: f64 = 0.10;

/// Need score for the slot a position holds on a team's list.
pub fn need_score(team: &TeamNeedProfile, position: Position) -> f64 {
    match team.need_slot(position) {
        Some(0) => 1.0,
        Some(1) => 0.72,
        Some(2) => 0.48,
        _ => 0.15,
    }
}

fn is_offense(position: Position) -> bool {
    matches!(
        position,
        Position::Qb | Position::Rb | Position::Wr | Position::Te | Position::Ot | Position::Iol
    )
}

pub fn scheme_score(team: &TeamNeedProfile, position: Position) -> f64 {
    if is_offense(position) {
        let offense = team.off_scheme.as_str();
        if matches!(offense, "shanahan" | "wide_zone")
            && matches!(position, Position::Ot | Position::Te | Position::Rb)
        {
            return 0.92;
        }
        if matches!(offense, "spread" | "shotgun_spread" | "vertical")
            && matches!(position, Position::Qb | Position::Wr)
        {
            return 0.9;
        }
        return 0.7;
    }

    let defense = team.def_scheme.as_str();
    if matches!(defense, "3-4" | "multiple")
        && matches!(
            position,
            Position::Edge | Position::Lb | Position::Cb | Position::S
        )
    {
        return 0.9;
    }
    if matches!(defense, "4-3" | "4-2-5")
        && matches!(
            position,
            Position::Dt | Position::Edge | Position::Cb | Position::S
        )
    {
        return 0.88;
    }
    0.68
}

pub fn gm_tendency_score(team: &TeamNeedProfile, position: Position) -> f64 {
    let trenches = matches!(
        position,
        Position::Ot | Position::Iol | Position::Edge | Position::Dt
    );
    let speed = matches!(
        position,
        Position::Wr | Position::Cb | Position::Edge | Position::Rb
    );
    let offense_core = matches!(position, Position::Qb | Position::Wr | Position::Ot);
    match team.gm_profile.as_str() {
        "trench_focus" | "bpa_trenches" if trenches => 0.9,
        "speed_priority" | "traits_speed" if speed => 0.88,
        "reset_qb" | "offense_first" if offense_core => 0.9,
        _ => 0.72,
    }
}

/// Team fit on a 0-1 scale.
pub fn team_fit(team: &TeamNeedProfile, position: Position) -> f64 {
    NEED_WEIGHT * need_score(team, position)
        + SCHEME_WEIGHT * scheme_score(team, position)
        + NEUTRAL_WEIGHT * NEUTRAL_SCORE
        + GM_WEIGHT * gm_tendency_score(team, position)
}

/// Best-fitting team for a position, scaled to 0-100. Ties keep the team
/// listed first.
pub fn best_team_fit(teams: &[TeamNeedProfile], position: Position) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for team in teams {
        let fit = team_fit(team, position);
        if best.is_none_or(|(_, current)| fit > current) {
            best = Some((team.team.as_str(), fit));
        }
    }
    best.map(|(team, fit)| (team, (fit * 10_000.0).round() / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, needs: &[Position], off: &str, def: &str, gm: &str) -> TeamNeedProfile {
        TeamNeedProfile {
            team: name.into(),
            needs: needs.to_vec(),
            off_scheme: off.into(),
            def_scheme: def.into(),
            gm_profile: gm.into(),
        }
    }

    #[test]
    fn need_slots() {
        let t = team("CLE", &[Position::Qb, Position::Wr, Position::Ot], "", "", "");
        assert_eq!(need_score(&t, Position::Qb), 1.0);
        assert_eq!(need_score(&t, Position::Wr), 0.72);
        assert_eq!(need_score(&t, Position::Ot), 0.48);
        assert_eq!(need_score(&t, Position::S), 0.15);
    }

    #[test]
    fn scheme_and_gm_rules() {
        let t = team("SF", &[], "shanahan", "4-3", "trench_focus");
        assert_eq!(scheme_score(&t, Position::Ot), 0.92);
        assert_eq!(scheme_score(&t, Position::Qb), 0.7);
        assert_eq!(scheme_score(&t, Position::Dt), 0.88);
        assert_eq!(scheme_score(&t, Position::Lb), 0.68);
        assert_eq!(gm_tendency_score(&t, Position::Edge), 0.9);
        assert_eq!(gm_tendency_score(&t, Position::Cb), 0.72);
    }

    #[test]
    fn fit_formula() {
        let t = team("TEN", &[Position::Qb], "spread", "", "reset_qb");
        let expected = 0.5 * 1.0 + 0.25 * 0.9 + 0.15 * 0.75 + 0.10 * 0.9;
        assert!((team_fit(&t, Position::Qb) - expected).abs() < 1e-12);
    }

    #[test]
    fn best_fit_prefers_need() {
        let teams = vec![
            team("NYG", &[Position::Ot], "", "", ""),
            team("LV", &[Position::Cb, Position::Ot], "", "", ""),
        ];
        let (name, fit) = best_team_fit(&teams, Position::Ot).unwrap();
        assert_eq!(name, "NYG");
        assert!(fit > 80.0);
        assert!(best_team_fit(&[], Position::Ot).is_none());
    }
}
