//! Status screen formatting for the 16x2 panel.
//!
//! Pure functions from domain values to two bounded lines of text; pushing
//! the lines through the [`StatusDisplay`](crate::app::ports::StatusDisplay)
//! port is the caller's job.  Lines are `heapless` strings capped at the
//! panel width, so an over-wide rendering loses whatever does not fit past
//! column 16, like the glass itself.

use core::fmt::Write as _;

use crate::classifier::{CauseSet, FLAME_PRESENT_THRESHOLD, SensorSnapshot};

/// Character columns on the panel.
pub const DISPLAY_COLS: usize = 16;

/// One display line, bounded at the panel width.
pub type Line = heapless::String<DISPLAY_COLS>;

/// A full two-line screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    pub line0: Line,
    pub line1: Line,
}

/// Boot splash, shown while the node brings its links up.
pub fn boot_screen() -> Screen {
    let mut screen = Screen::default();
    let _ = screen.line0.push_str("Smart Kitchen");
    screen
}

/// Danger screen: a fixed header and the active causes in display order.
pub fn danger_screen(causes: CauseSet) -> Screen {
    let mut screen = Screen::default();
    let _ = screen.line0.push_str("DANGER Reason:");
    let _ = write!(screen.line1, "{causes}");
    screen
}

/// Safe screen: climate on the first line, gas level and a flame flag on
/// the second.  Absent climate readings render as `--`, never as a number.
pub fn safe_screen(snap: &SensorSnapshot) -> Screen {
    let mut screen = Screen::default();

    match snap.temperature_c {
        Some(t) => {
            let _ = write!(screen.line0, "T:{t:.1}C");
        }
        None => {
            let _ = screen.line0.push_str("T:--C");
        }
    }
    match snap.humidity_pct {
        Some(h) => {
            let _ = write!(screen.line0, " H:{h:.0}");
        }
        None => {
            let _ = screen.line0.push_str(" H:--");
        }
    }

    let flame_flag = if snap.flame_level < FLAME_PRESENT_THRESHOLD {
        "YES"
    } else {
        "NO "
    };
    let _ = write!(screen.line1, "Gas:{} F:{flame_flag}", snap.gas_level);

    screen
}

// ───────────────────────────────────────────────────────────────
