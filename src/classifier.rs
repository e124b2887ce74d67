//! Danger classifier.
//!
//! A pure, total function from the latest [`SensorSnapshot`] to a
//! [`DangerVerdict`].  It runs **every cycle** and is level-triggered:
//! there is no hysteresis or debouncing, so one qualifying reading flips
//! the verdict and one clean reading flips it back.  Readings that sit on
//! a threshold boundary flap the actuators at the sample cadence — a known
//! limitation of the fixed policy, kept as-is.
//!
//! Thresholds are design constants, not configuration: the node is a
//! safety device and its trip points do not move per deployment.

use core::fmt;

/// Gas trips above this raw count.
pub const GAS_DANGER_THRESHOLD: u16 = 2000;
/// Flame trips below this raw count (lower reading = more flame on this
/// sensor family).
pub const FLAME_PRESENT_THRESHOLD: u16 = 2500;
/// Temperature trips above this, °C.
pub const TEMP_DANGER_THRESHOLD_C: f32 = 40.0;

// ───────────────────────────────────────────────────────────────
// Snapshot
// ───────────────────────────────────────────────────────────────

/// One cycle's sensor readings, immutable once taken.
///
/// The climate channels are optional: a silent DHT-class sensor yields
/// `None`, never a substitute value — a fake `0.0 °C` could mask a real
/// fault and must not reach the classifier or the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSnapshot {
    pub gas_level: u16,
    pub flame_level: u16,
    pub temperature_c: Option<f32>,
    pub humidity_pct: Option<f32>,
}

// ───────────────────────────────────────────────────────────────
// Causes
// ───────────────────────────────────────────────────────────────

/// A single contributing condition to an overall danger verdict.
///
/// The discriminants are bit positions so a [`CauseSet`] packs into one
/// byte, and the declaration order is the fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DangerCause {
    Gas = 0b001,
    Flame = 0b010,
    Temp = 0b100,
}

impl DangerCause {
    /// Fixed display order: gas, flame, temperature.
    pub const DISPLAY_ORDER: [Self; 3] = [Self::Gas, Self::Flame, Self::Temp];

    /// Return the bitmask for this cause.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DangerCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gas => write!(f, "Gas"),
            Self::Flame => write!(f, "Flame"),
            Self::Temp => write!(f, "Temp"),
        }
    }
}

/// Set of active danger causes, packed into one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CauseSet(u8);

impl CauseSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a cause.
    pub fn insert(&mut self, cause: DangerCause) {
        self.0 |= cause.mask();
    }

    /// Whether `cause` is active.
    pub const fn contains(self, cause: DangerCause) -> bool {
        self.0 & cause.mask() != 0
    }

    /// Whether no cause is active.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of active causes.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Active causes in display order.
    pub fn iter(self) -> impl Iterator<Item = DangerCause> {
        DangerCause::DISPLAY_ORDER
            .into_iter()
            .filter(move |c| self.contains(*c))
    }
}

/// Renders each active cause followed by a space, in display order:
/// `"Gas Flame Temp "`.  This is the exact second-line text of the danger
/// screen, so the display and the log agree character for character.
impl fmt::Display for CauseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cause in self.iter() {
            write!(f, "{cause} ")?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Verdict
// ───────────────────────────────────────────────────────────────

/// The classifier's output.  `is_danger` is derived from the cause set,
/// so "danger with no cause" and "safe with causes" are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DangerVerdict {
    causes: CauseSet,
}

impl DangerVerdict {
    /// Whether any cause is active.
    pub const fn is_danger(self) -> bool {
        !self.causes.is_empty()
    }

    /// The active causes.
    pub const fn causes(self) -> CauseSet {
        self.causes
    }
}

/// Classify one snapshot.  Pure and total: absent readings contribute no
/// cause and can never make this panic.
pub fn classify(snap: &SensorSnapshot) -> DangerVerdict {
    let mut causes = CauseSet::empty();

    if snap.gas_level > GAS_DANGER_THRESHOLD {
        causes.insert(DangerCause::Gas);
    }
    if snap.flame_level < FLAME_PRESENT_THRESHOLD {
        causes.insert(DangerCause::Flame);
    }
    if let Some(temp) = snap.temperature_c {
        if temp > TEMP_DANGER_THRESHOLD_C {
            causes.insert(DangerCause::Temp);
        }
    }

    DangerVerdict { causes }
}

// ───────────────────────────────────────────────────────────────
