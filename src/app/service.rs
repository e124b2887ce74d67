//! Node service — the hexagonal core.
//!
//! [`NodeService`] owns the actuator context and runs the forever-loop
//! body: recover the broker session, service one inbound command, sample,
//! classify, drive the panel and screen, publish telemetry, idle.  All
//! I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  SensorGateway ──▶ ┌──────────────────────────┐ ──▶ MessagingChannel
//!                    │       NodeService         │
//!  ActuatorPanel ◀── │  classify · command ·     │ ◀── (inbound commands)
//!  StatusDisplay ◀── │  session recovery         │
//!                    └──────────────────────────┘
//! ```
//!
//! The whole node is one sequential thread: every wait (inter-sample
//! idle, servo settle, reconnect back-off) is a blocking [`Clock`] sleep,
//! and nothing ever runs concurrently with anything else.

use core::time::Duration;

use log::{debug, info, warn};

use crate::classifier::{DangerVerdict, SensorSnapshot, classify};
use crate::display::{self, Screen};
use crate::session;
use crate::telemetry::TelemetryMessage;

use super::commands::{self, CommandChannel, InboundCommand, TOPIC_TELEMETRY};
use super::ports::{
    ActuatorPanel, Clock, Credentials, MessagingChannel, SensorGateway, StatusDisplay,
};

/// Pause between control cycles.
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(10);
/// Pause after moving the vent servo before confirming the move.
pub const SERVO_SETTLE: Duration = Duration::from_secs(5);
/// How long the boot splash stays on the screen.
pub const BOOT_SPLASH_HOLD: Duration = Duration::from_millis(1500);

/// Vent angle while conditions are safe (open).
pub const SAFE_VENT_ANGLE: u8 = 180;
/// Vent angle while in danger (closed).
pub const DANGER_VENT_ANGLE: u8 = 0;

// ───────────────────────────────────────────────────────────────
// Actuator context
// ───────────────────────────────────────────────────────────────

/// What the core last commanded the panel to do.  Written by exactly one
/// path per cycle: the verdict sweep or the command handler, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    pub indicator_on: bool,
    pub alarm_on: bool,
    pub position_angle: u8,
}

impl ActuatorState {
    /// Panel state for a danger verdict: everything on, vent closed.
    pub const fn danger() -> Self {
        Self {
            indicator_on: true,
            alarm_on: true,
            position_angle: DANGER_VENT_ANGLE,
        }
    }

    /// Panel state for a safe verdict: everything off, vent open.
    pub const fn safe() -> Self {
        Self {
            indicator_on: false,
            alarm_on: false,
            position_angle: SAFE_VENT_ANGLE,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// NodeService
// ───────────────────────────────────────────────────────────────

/// The node's domain core.  Construct once at process start; a test
/// harness can construct and drop as many as it likes.
pub struct NodeService {
    actuators: ActuatorState,
    /// Servo angle as reported in telemetry.  Follows explicit position
    /// commands only — the safe/danger sweeps move the vent without
    /// touching it, so the reported angle can lag the real one.  The
    /// supervisor protocol has not decided which angle it actually wants,
    /// so this mirrors the field's historical meaning instead of guessing.
    reported_position: u8,
    danger_latched: bool,
    cycle_count: u64,
}

impl Default for NodeService {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeService {
    pub fn new() -> Self {
        Self {
            actuators: ActuatorState::default(),
            reported_position: 0,
            danger_latched: false,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot sequence: splash the screen, hold it, then blank everything
    /// into a known-off state.  The vent is deliberately not commanded
    /// here — the first classified cycle decides where it belongs.
    pub fn startup(
        &mut self,
        hw: &mut (impl ActuatorPanel + StatusDisplay),
        clock: &mut impl Clock,
    ) {
        show(&display::boot_screen(), hw);
        clock.sleep(BOOT_SPLASH_HOLD);
        hw.clear();

        hw.set_indicator(false);
        hw.set_alarm(false);
        self.actuators = ActuatorState::default();
        info!("panel initialised, node ready");
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies sensor, panel **and** display ports —
    /// one bench object, which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl SensorGateway + ActuatorPanel + StatusDisplay),
        link: &mut impl MessagingChannel,
        clock: &mut impl Clock,
        identity: &str,
        credentials: &Credentials<'_>,
    ) {
        self.cycle_count += 1;

        // 1. A dead session blocks everything until it is back.
        if !link.is_connected() {
            session::recover(link, clock, identity, credentials);
        }

        // 2. Service at most one inbound command.
        if let Some(cmd) = link.poll() {
            self.handle_command(cmd, hw, link, clock);
        }

        // 3+4. Sample and classify.
        let snap = read_snapshot(hw);
        let verdict = classify(&snap);
        info!(
            "cycle {}: gas={} flame={} temp={:?} hum={:?}",
            self.cycle_count, snap.gas_level, snap.flame_level, snap.temperature_c,
            snap.humidity_pct
        );

        // 5. Drive panel and screen off the verdict.
        self.apply_verdict(verdict, &snap, hw);

        // 6. Publish the cycle's telemetry.
        self.publish_telemetry(&snap, verdict, &*hw, link);

        // 7. Idle until the next sample.
        clock.sleep(SAMPLE_PERIOD);
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one inbound command and publish its confirmation.
    pub fn handle_command(
        &mut self,
        cmd: InboundCommand,
        hw: &mut impl ActuatorPanel,
        link: &mut impl MessagingChannel,
        clock: &mut impl Clock,
    ) {
        info!("command on '{}': {:?}", cmd.channel.topic(), cmd.payload);
        match cmd.channel {
            CommandChannel::Indicator => {
                let on = commands::parse_switch(&cmd.payload);
                self.actuators.indicator_on = on;
                hw.set_indicator(on);
                self.confirm(
                    link,
                    CommandChannel::Indicator,
                    if on { "LED ON" } else { "LED OFF" },
                );
            }
            CommandChannel::Position => {
                let angle = commands::parse_position(&cmd.payload);
                self.actuators.position_angle = angle;
                hw.set_position(angle);
                // The horn needs time to physically reach the target;
                // the confirmation must not beat it there.
                clock.sleep(SERVO_SETTLE);
                self.reported_position = angle;
                self.confirm(
                    link,
                    CommandChannel::Position,
                    &format!("Servo moved to {angle}"),
                );
            }
            CommandChannel::Alarm => {
                let on = commands::parse_switch(&cmd.payload);
                self.actuators.alarm_on = on;
                hw.set_alarm(on);
                self.confirm(
                    link,
                    CommandChannel::Alarm,
                    if on { "Buzzer ON" } else { "Buzzer OFF" },
                );
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The last state the core commanded.
    pub fn actuator_state(&self) -> ActuatorState {
        self.actuators
    }

    /// Servo angle as telemetry reports it (last explicit command).
    pub fn reported_position(&self) -> u8 {
        self.reported_position
    }

    /// Control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Level-triggered actuation: the full panel state is re-applied every
    /// cycle, relying on the panel's idempotent set calls.
    fn apply_verdict(
        &mut self,
        verdict: DangerVerdict,
        snap: &SensorSnapshot,
        hw: &mut (impl ActuatorPanel + StatusDisplay),
    ) {
        if verdict.is_danger() {
            warn!("DANGER: {}", verdict.causes());
        } else {
            if self.danger_latched {
                info!("conditions back to normal");
            }
            debug!("safe");
        }
        self.danger_latched = verdict.is_danger();

        self.actuators = if verdict.is_danger() {
            ActuatorState::danger()
        } else {
            ActuatorState::safe()
        };
        hw.set_indicator(self.actuators.indicator_on);
        hw.set_alarm(self.actuators.alarm_on);
        hw.set_position(self.actuators.position_angle);

        let screen = if verdict.is_danger() {
            display::danger_screen(verdict.causes())
        } else {
            display::safe_screen(snap)
        };
        show(&screen, hw);
    }

    fn publish_telemetry(
        &self,
        snap: &SensorSnapshot,
        verdict: DangerVerdict,
        panel: &impl ActuatorPanel,
        link: &mut impl MessagingChannel,
    ) {
        let msg = TelemetryMessage::new(
            snap,
            verdict,
            panel.indicator_on(),
            panel.alarm_on(),
            self.reported_position,
        );
        match msg.to_json() {
            Ok(json) => {
                if let Err(e) = link.publish(TOPIC_TELEMETRY, &json) {
                    warn!("telemetry publish failed: {e}");
                } else {
                    debug!("telemetry: {json}");
                }
            }
            Err(e) => warn!("telemetry encode failed: {e}"),
        }
    }

    fn confirm(&self, link: &mut impl MessagingChannel, channel: CommandChannel, text: &str) {
        if let Err(e) = link.publish(channel.confirm_topic(), text) {
            warn!("confirmation on '{}' failed: {e}", channel.confirm_topic());
        }
    }
}

/// Read all four channels into one immutable snapshot.
fn read_snapshot(hw: &mut impl SensorGateway) -> SensorSnapshot {
    SensorSnapshot {
        gas_level: hw.gas_level(),
        flame_level: hw.flame_level(),
        temperature_c: hw.temperature_c(),
        humidity_pct: hw.humidity_pct(),
    }
}

/// Blank the screen and push both lines of `screen`.
fn show(screen: &Screen, hw: &mut impl StatusDisplay) {
    hw.clear();
    hw.write_at(0, 0, &screen.line0);
    hw.write_at(1, 0, &screen.line1);
}

// ───────────────────────────────────────────────────────────────
