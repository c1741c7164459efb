//! The default scouting rules, in evaluation order.

use std::cmp::{Ordering, Reverse};

use super::InsightRule;
use crate::models::{Aggregates, Insight, InsightCategory, WinTally};

/// Minimum rounds per side before comparing attack and defense.
pub const SIDE_MIN_ROUNDS: u32 = 10;
/// Percentage-point gap between sides that counts as an imbalance.
pub const SIDE_GAP: f64 = 15.0;

pub const CHOKE_MIN_FIRST_BLOODS: u32 = 5;
pub const CHOKE_RATE: f64 = 35.0;

pub const PISTOL_MIN_ROUNDS: u32 = 4;
pub const PISTOL_WEAK_RATE: f64 = 35.0;
pub const PISTOL_STRONG_RATE: f64 = 65.0;

pub const FORCE_MIN_ROUNDS: u32 = 4;
pub const FORCE_DANGER_RATE: f64 = 40.0;
pub const FULL_BUY_MIN_ROUNDS: u32 = 10;
pub const FULL_BUY_WEAK_RATE: f64 = 45.0;

/// Games on a map before it is recommended as a pick or ban.
pub const MAP_MIN_PLAYED: u32 = 2;
pub const MAP_TARGET_RATE: u32 = 40;
pub const MAP_BAN_RATE: u32 = 70;

pub const TILT_MIN_POST_PISTOL: u32 = 4;
pub const TILT_POST_PISTOL_RATE: f64 = 25.0;
pub const TILT_MIN_BEHIND_AT_HALF: u32 = 2;
pub const TILT_LOSS_STREAK: u32 = 6;

pub const TARGET_MIN_ROUNDS: u32 = 20;
pub const TARGET_FD_RATE: f64 = 20.0;
/// K/D under which a player is a weak link when first-blood data is missing.
pub const WEAK_LINK_KD: f64 = 0.8;

pub const ONE_TRICK_MIN_MAPS: u32 = 3;
pub const ONE_TRICK_SHARE: f64 = 80.0;

pub const PLAYSTYLE_MIN_WINS: u32 = 10;
pub const AGGRESSIVE_SHARE: f64 = 70.0;
pub const OBJECTIVE_SHARE: f64 = 50.0;

/// The rule list used by [`super::InsightEngine::default`].
pub fn default_rules() -> Vec<Box<dyn InsightRule>> {
    vec![
        Box::new(SideImbalanceRule),
        Box::new(FirstBloodChokeRule),
        Box::new(PistolRule),
        Box::new(EconomyRule),
        Box::new(MapTargetRule),
        Box::new(MapBanRule),
        Box::new(TiltRule),
        Box::new(PlayerTargetRule),
        Box::new(OneTrickRule),
        Box::new(PlaystyleRule),
    ]
}

fn record(tally: &WinTally) -> String {
    format!("{}/{} ({:.0}%)", tally.wins, tally.total, tally.rate())
}

/// Attack and defense win rates far apart.
pub struct SideImbalanceRule;

impl InsightRule for SideImbalanceRule {
    fn name(&self) -> &'static str {
        "side_imbalance"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::Side
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let sides = aggregates.round_sides.as_ref()?;
        if sides.attack.total < SIDE_MIN_ROUNDS || sides.defense.total < SIDE_MIN_ROUNDS {
            return None;
        }

        let attack = sides.attack.rate();
        let defense = sides.defense.rate();
        if (attack - defense).abs() < SIDE_GAP {
            return None;
        }

        let (strong, strong_rate, weak, weak_rate) = if attack > defense {
            ("attack", attack, "defense", defense)
        } else {
            ("defense", defense, "attack", attack)
        };
        Some(Insight::new(
            self.category(),
            format!(
                "Much stronger on {} ({:.0}% of rounds) than on {} ({:.0}%). Make them win their {} rounds.",
                strong, strong_rate, weak, weak_rate, weak
            ),
        ))
    }
}

/// Team takes first blood but still loses the round.
pub struct FirstBloodChokeRule;

impl InsightRule for FirstBloodChokeRule {
    fn name(&self) -> &'static str {
        "first_blood_choke"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::FirstBloodChoke
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let fb = aggregates.first_blood.as_ref()?;
        if fb.team_fbs < CHOKE_MIN_FIRST_BLOODS || fb.fb_choke_rate < CHOKE_RATE {
            return None;
        }

        Some(Insight::new(
            self.category(),
            format!(
                "Loses {:.0}% of rounds after taking first blood ({} of {}). Keep trading after losing the opening duel.",
                fb.fb_choke_rate, fb.fb_losses, fb.team_fbs
            ),
        ))
    }
}

/// Pistol rounds clearly won or lost.
pub struct PistolRule;

impl InsightRule for PistolRule {
    fn name(&self) -> &'static str {
        "pistol_rounds"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::Pistol
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let pistol = aggregates.round_sides.as_ref()?.pistol_total();
        if pistol.total < PISTOL_MIN_ROUNDS {
            return None;
        }

        let rate = pistol.rate();
        let text = if rate <= PISTOL_WEAK_RATE {
            format!(
                "Weak on pistol rounds, winning {}. Take pistol fights aggressively.",
                record(&pistol)
            )
        } else if rate >= PISTOL_STRONG_RATE {
            format!(
                "Strong on pistol rounds, winning {}. Respect their pistol setups and play for trades.",
                record(&pistol)
            )
        } else {
            return None;
        };
        Some(Insight::new(self.category(), text))
    }
}

/// Force buys that convert, or full buys that do not.
pub struct EconomyRule;

impl InsightRule for EconomyRule {
    fn name(&self) -> &'static str {
        "economy"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::Economy
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let economy = aggregates.economy.as_ref()?;

        if economy.force_buy.total >= FORCE_MIN_ROUNDS && economy.force_buy.rate() >= FORCE_DANGER_RATE {
            return Some(Insight::new(
                self.category(),
                format!(
                    "Dangerous on force buys, winning {}. Do not treat their broken-economy rounds as free.",
                    record(&economy.force_buy)
                ),
            ));
        }

        if economy.full_buy.total >= FULL_BUY_MIN_ROUNDS && economy.full_buy.rate() < FULL_BUY_WEAK_RATE {
            return Some(Insight::new(
                self.category(),
                format!(
                    "Struggles in full-buy rounds, winning only {}. Play for even gunfights when both teams buy.",
                    record(&economy.full_buy)
                ),
            ));
        }

        None
    }
}

/// A map they keep losing.
pub struct MapTargetRule;

impl InsightRule for MapTargetRule {
    fn name(&self) -> &'static str {
        "map_target"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::MapTarget
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let worst = aggregates
            .map_pool
            .as_ref()?
            .iter()
            .filter(|m| m.played >= MAP_MIN_PLAYED && m.win_rate <= MAP_TARGET_RATE)
            .min_by_key(|m| m.win_rate)?;

        Some(Insight::new(
            self.category(),
            format!(
                "Pick {}: they are {}-{} there ({}% over {} games, {:+} round differential).",
                worst.map, worst.wins, worst.losses, worst.win_rate, worst.played, worst.round_diff
            ),
        ))
    }
}

/// A map they keep winning.
pub struct MapBanRule;

impl InsightRule for MapBanRule {
    fn name(&self) -> &'static str {
        "map_ban"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::MapBan
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let best = aggregates
            .map_pool
            .as_ref()?
            .iter()
            .filter(|m| m.played >= MAP_MIN_PLAYED && m.win_rate >= MAP_BAN_RATE)
            .min_by_key(|m| Reverse(m.win_rate))?;

        Some(Insight::new(
            self.category(),
            format!(
                "Ban {}: they are {}-{} there ({}% over {} games).",
                best.map, best.wins, best.losses, best.win_rate, best.played
            ),
        ))
    }
}

/// Collapses after setbacks.
pub struct TiltRule;

impl InsightRule for TiltRule {
    fn name(&self) -> &'static str {
        "tilt"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::Tilt
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let momentum = aggregates.momentum.as_ref()?;

        let after_loss = &momentum.post_pistol_loss;
        let text = if after_loss.total >= TILT_MIN_POST_PISTOL
            && after_loss.rate() <= TILT_POST_PISTOL_RATE
        {
            format!(
                "Tilts after losing a pistol round: won {} of the following two rounds. Press the advantage after a pistol win.",
                record(after_loss)
            )
        } else if momentum.behind_at_half >= TILT_MIN_BEHIND_AT_HALF && momentum.comebacks == 0 {
            format!(
                "Never came back from a half-time deficit ({} maps behind at the half, 0 won). Build an early lead.",
                momentum.behind_at_half
            )
        } else if momentum.max_loss_streak >= TILT_LOSS_STREAK {
            format!(
                "Prone to long losing runs (worst streak {} rounds). Keep pressure on after consecutive wins.",
                momentum.max_loss_streak
            )
        } else {
            return None;
        };
        Some(Insight::new(self.category(), text))
    }
}

/// A player to hunt. First-blood data is preferred; K/D is the fallback.
pub struct PlayerTargetRule;

impl PlayerTargetRule {
    fn from_first_blood(&self, aggregates: &Aggregates) -> Option<Insight> {
        let fb = aggregates.first_blood.as_ref()?;
        let target = fb
            .players
            .iter()
            .filter(|p| p.rounds >= TARGET_MIN_ROUNDS && p.fd_rate >= TARGET_FD_RATE)
            .min_by(|a, b| b.fd_rate.partial_cmp(&a.fd_rate).unwrap_or(Ordering::Equal))?;

        Some(Insight::new(
            self.category(),
            format!(
                "{} dies first in about {:.0}% of rounds ({} of {}). Hunt them in opening duels.",
                target.name, target.fd_rate, target.first_deaths, target.rounds
            ),
        ))
    }

    fn from_kd(&self, aggregates: &Aggregates) -> Option<Insight> {
        let overview = aggregates.overview.as_ref()?;
        let target = overview
            .players
            .iter()
            .filter(|p| p.kd < WEAK_LINK_KD)
            .min_by(|a, b| a.kd.partial_cmp(&b.kd).unwrap_or(Ordering::Equal))?;

        Some(Insight::new(
            self.category(),
            format!(
                "{} has a {:.2} K/D ratio. Target this player for trades.",
                target.name, target.kd
            ),
        ))
    }
}

impl InsightRule for PlayerTargetRule {
    fn name(&self) -> &'static str {
        "player_target"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::PlayerTarget
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        if aggregates.first_blood.is_some() {
            self.from_first_blood(aggregates)
        } else {
            self.from_kd(aggregates)
        }
    }
}

/// A player locked onto one agent.
pub struct OneTrickRule;

impl InsightRule for OneTrickRule {
    fn name(&self) -> &'static str {
        "one_trick"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::OneTrick
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let compositions = aggregates.compositions.as_ref()?;

        compositions.player_agents.iter().find_map(|pool| {
            let maps = pool.maps_played();
            let main = pool.main_agent()?;
            let share = crate::calculate::percentage(main.count, maps);
            if maps < ONE_TRICK_MIN_MAPS || share < ONE_TRICK_SHARE {
                return None;
            }
            Some(Insight::new(
                self.category(),
                format!(
                    "{} played {} on {} of {} maps. Pick or ban around that agent.",
                    pool.name, main.agent, main.count, maps
                ),
            ))
        })
    }
}

/// How they close out rounds.
pub struct PlaystyleRule;

impl InsightRule for PlaystyleRule {
    fn name(&self) -> &'static str {
        "playstyle"
    }

    fn category(&self) -> InsightCategory {
        InsightCategory::Playstyle
    }

    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight> {
        let wins = aggregates.win_conditions.as_ref()?;
        if wins.total_wins < PLAYSTYLE_MIN_WINS {
            return None;
        }

        let elimination = crate::calculate::percentage(wins.wins.elimination, wins.total_wins);
        let spike = crate::calculate::percentage(wins.wins.spike, wins.total_wins);

        let text = if elimination >= AGGRESSIVE_SHARE {
            format!(
                "Aggressive: {:.0}% of their round wins end in a full elimination. Expect them to hunt for kills rather than play the spike.",
                elimination
            )
        } else if spike >= OBJECTIVE_SHARE {
            format!(
                "Objective-focused: {:.0}% of their round wins end without a full wipe. Expect spike plays and retakes over extended fights.",
                spike
            )
        } else {
            return None;
        };
        Some(Insight::new(self.category(), text))
    }
}
