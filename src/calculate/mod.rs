//! Statistics calculation engine.
//!
//! Every analyzer is a pure function over a slice of normalized games:
//! - Map pool win/loss and round differential
//! - Attack/defense and pistol round win rates
//! - First blood conversion, first-kill trends by agent and map
//! - Win-condition and economy-phase inference
//! - Momentum (streaks, half splits, comebacks)
//! - Agent compositions and player agent pools
//! - Kill/death overview

pub mod composition;
pub mod economy;
pub mod first_blood;
pub mod fb_trends;
pub mod map_pool;
pub mod momentum;
pub mod overview;
pub mod round_side;
pub mod win_condition;

pub use composition::analyze_compositions;
pub use economy::{analyze_economy, classify_rounds};
pub use fb_trends::analyze_first_blood_trends;
pub use first_blood::analyze_first_blood;
pub use map_pool::analyze_map_pool;
pub use momentum::analyze_momentum;
pub use overview::team_overview;
pub use round_side::analyze_round_sides;
pub use win_condition::{analyze_win_conditions, classify_round};

/// First round of the first half.
pub const FIRST_PISTOL_ROUND: u32 = 1;

/// First round of the second half. Halftime is fixed here; every later
/// round, overtime included, counts as second half.
pub const SECOND_PISTOL_ROUND: u32 = 13;

/// Whether a round is played on pistol economy.
pub fn is_pistol_round(round_num: u32) -> bool {
    round_num == FIRST_PISTOL_ROUND || round_num == SECOND_PISTOL_ROUND
}

/// Whether a round falls in the first half.
pub fn is_first_half(round_num: u32) -> bool {
    round_num < SECOND_PISTOL_ROUND
}

/// `part / whole * 100`, 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

/// [`percentage`] rounded to the nearest whole number.
pub fn rounded_percentage(part: u32, whole: u32) -> u32 {
    percentage(part, whole).round() as u32
}

/// Kills over deaths; kills alone when there were no deaths.
pub fn kd_ratio(kills: u32, deaths: u32) -> f64 {
    if deaths == 0 {
        f64::from(kills)
    } else {
        f64::from(kills) / f64::from(deaths)
    }
}
