//! ANSI color helper utilities for terminal output.

use crate::models::calendar::IntensityTier;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";

/// Purple ramp (256-color) used by the activity calendar, lightest first.
const TIER_PALETTE: [&str; 5] = [
    "\x1b[38;5;252m",
    "\x1b[38;5;183m",
    "\x1b[38;5;141m",
    "\x1b[38;5;98m",
    "\x1b[38;5;54m",
];

pub fn color_for_tier(tier: IntensityTier) -> &'static str {
    TIER_PALETTE[tier.index()]
}

/// Podium colors for the first three ranks.
pub fn color_for_rank(rank: usize) -> &'static str {
    match rank {
        1 => YELLOW,
        2 => GREY,
        3 => MAGENTA,
        _ => RESET,
    }
}

/// Green once the target is met, yellow half way, red below.
pub fn color_for_progress(percent: f64) -> &'static str {
    if percent >= 100.0 {
        GREEN
    } else if percent >= 50.0 {
        YELLOW
    } else {
        RED
    }
}
