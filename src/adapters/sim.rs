//! Simulated kitchen bench.
//!
//! One in-memory object stands in for the whole bench: gas and flame
//! analog channels, the DHT-style climate sensor, the LED/buzzer/servo
//! panel and the 16x2 character display.  Sensor readings ripple slightly
//! around their programmed base values so an unattended run produces live
//! looking numbers, and every actuator change is logged.
//!
//! The sim is the default bench for `kitchenguard` on a workstation; it is
//! also handy for demos against a local broker.

use log::{debug, info};

use crate::app::ports::{ActuatorPanel, SensorGateway, StatusDisplay};
use crate::display::DISPLAY_COLS;

/// Full analog scale of the reference board's ADC.
const ADC_FULL_SCALE: u16 = 4095;

/// In-memory bench implementing all three hardware-facing ports.
pub struct SimBench {
    // Sensor bases; reads ripple around these.
    gas: u16,
    flame: u16,
    temperature: Option<f32>,
    humidity: Option<f32>,
    tick: u32,

    // Panel state.
    indicator: bool,
    alarm: bool,
    position: u8,

    // Display frame, one byte per cell.
    frame: [[u8; DISPLAY_COLS]; 2],
}

impl Default for SimBench {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBench {
    /// A quiet kitchen: low gas, no flame, mild climate.
    pub fn new() -> Self {
        Self {
            gas: 500,
            flame: 3500,
            temperature: Some(24.0),
            humidity: Some(45.0),
            tick: 0,
            indicator: false,
            alarm: false,
            position: 0,
            frame: [[b' '; DISPLAY_COLS]; 2],
        }
    }

    // ── Scenario controls ─────────────────────────────────────

    pub fn set_gas(&mut self, raw: u16) {
        self.gas = raw.min(ADC_FULL_SCALE);
    }

    pub fn set_flame(&mut self, raw: u16) {
        self.flame = raw.min(ADC_FULL_SCALE);
    }

    pub fn set_climate(&mut self, temperature_c: Option<f32>, humidity_pct: Option<f32>) {
        self.temperature = temperature_c;
        self.humidity = humidity_pct;
    }

    /// Current servo angle, as last commanded.
    pub fn position(&self) -> u8 {
        self.position
    }

    /// One display line, rendered as text (trailing blanks included).
    pub fn line(&self, row: usize) -> String {
        self.frame[row].iter().map(|&b| b as char).collect()
    }

    /// Small deterministic ripple so successive reads differ.  Triangle
    /// wave over 8 ticks, a couple of counts either side of zero.
    fn ripple(&mut self) -> i32 {
        self.tick = self.tick.wrapping_add(1);
        let phase = (self.tick % 8) as i32;
        if phase < 4 { phase - 2 } else { 5 - phase }
    }
}

// ── SensorGateway implementation ──────────────────────────────

impl SensorGateway for SimBench {
    fn gas_level(&mut self) -> u16 {
        let r = self.ripple() * 4;
        (i32::from(self.gas) + r).clamp(0, i32::from(ADC_FULL_SCALE)) as u16
    }

    fn flame_level(&mut self) -> u16 {
        let r = self.ripple() * 4;
        (i32::from(self.flame) + r).clamp(0, i32::from(ADC_FULL_SCALE)) as u16
    }

    fn temperature_c(&mut self) -> Option<f32> {
        let r = self.ripple() as f32 * 0.05;
        self.temperature.map(|t| t + r)
    }

    fn humidity_pct(&mut self) -> Option<f32> {
        let r = self.ripple() as f32 * 0.1;
        self.humidity.map(|h| (h + r).clamp(0.0, 100.0))
    }
}

// ── ActuatorPanel implementation ──────────────────────────────

impl ActuatorPanel for SimBench {
    fn set_indicator(&mut self, on: bool) {
        if self.indicator != on {
            info!("sim panel: indicator {}", if on { "ON" } else { "off" });
        }
        self.indicator = on;
    }

    fn set_alarm(&mut self, on: bool) {
        if self.alarm != on {
            info!("sim panel: alarm {}", if on { "ON" } else { "off" });
        }
        self.alarm = on;
    }

    fn set_position(&mut self, angle: u8) {
        if self.position != angle {
            info!("sim panel: servo -> {angle} deg");
        }
        self.position = angle;
    }

    fn indicator_on(&self) -> bool {
        self.indicator
    }

    fn alarm_on(&self) -> bool {
        self.alarm
    }
}

// ── StatusDisplay implementation ──────────────────────────────

impl StatusDisplay for SimBench {
    fn clear(&mut self) {
        self.frame = [[b' '; DISPLAY_COLS]; 2];
    }

    fn write_at(&mut self, row: u8, col: u8, text: &str) {
        let Some(line) = self.frame.get_mut(row as usize) else {
            return;
        };
        let mut col = col as usize;
        for &b in text.as_bytes() {
            if col >= DISPLAY_COLS {
                break;
            }
            line[col] = b;
            col += 1;
        }
        debug!("sim lcd {}: [{}]", row, self.line(row as usize));
    }
}

// ───────────────────────────────────────────────────────────────
