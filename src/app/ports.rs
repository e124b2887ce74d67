//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (sensor bench, actuator panel, display, MQTT client,
//! system clock) implement these traits.  The
//! [`NodeService`](super::service::NodeService) consumes them via generics,
//! so the domain core never touches hardware or sockets directly.
//!
//! ## Contract notes
//!
//! - **SensorGateway** reads never fail loudly: the analog channels always
//!   produce a raw count, and the climate channels report a missing sensor
//!   as `None`, never as zero.
//! - **ActuatorPanel** set calls are idempotent — re-applying the current
//!   state is a no-op, not an error.
//! - **MessagingChannel** errors are typed; the caller decides at each call
//!   site whether a failure is swallowed (publish) or drives recovery
//!   (connect).

use core::time::Duration;

use super::commands::InboundCommand;

// ───────────────────────────────────────────────────────────────
// Sensor gateway (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain raw sensor channels.
pub trait SensorGateway {
    /// Gas concentration, raw ADC count (0–4095 on the reference board).
    fn gas_level(&mut self) -> u16;

    /// Flame intensity, raw ADC count.  Lower values mean more flame on
    /// this sensor family.
    fn flame_level(&mut self) -> u16;

    /// Ambient temperature in °C, or `None` when the climate sensor
    /// did not answer.
    fn temperature_c(&mut self) -> Option<f32>;

    /// Relative humidity in %, or `None` when the climate sensor
    /// did not answer.
    fn humidity_pct(&mut self) -> Option<f32>;
}

// ───────────────────────────────────────────────────────────────
// Actuator panel (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the panel.
pub trait ActuatorPanel {
    /// Switch the indicator LED.
    fn set_indicator(&mut self, on: bool);

    /// Switch the audible alarm.
    fn set_alarm(&mut self, on: bool);

    /// Move the vent servo to `angle` degrees (0–180).
    fn set_position(&mut self, angle: u8);

    /// Read back the indicator state (level on the output pin).
    fn indicator_on(&self) -> bool;

    /// Read back the alarm state.
    fn alarm_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Status display (driven adapter: domain → 16x2 panel)
// ───────────────────────────────────────────────────────────────

/// Two-line character display.  Writes past column 15 are dropped by the
/// adapter, matching the physical panel.
pub trait StatusDisplay {
    /// Blank both lines.
    fn clear(&mut self);

    /// Write `text` starting at (`row`, `col`).  `row` is 0 or 1.
    fn write_at(&mut self, row: u8, col: u8, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Messaging channel (driven adapter: domain ↔ broker)
// ───────────────────────────────────────────────────────────────

/// Broker credentials, borrowed from the configuration and passed through
/// to the transport untouched.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Connection-oriented publish/subscribe client.
///
/// A successful [`connect`](Self::connect) always starts a fresh session:
/// any half-open previous session is torn down and its subscriptions are
/// gone.  The recovery policy in [`session`](crate::session) relies on
/// this to make connect-plus-subscribe atomic.
pub trait MessagingChannel {
    /// Whether the session is currently usable.
    fn is_connected(&self) -> bool;

    /// Open a fresh session under `identity` with `credentials`.
    fn connect(&mut self, identity: &str, credentials: &Credentials<'_>) -> Result<(), CommsError>;

    /// Subscribe to one topic on the current session.
    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError>;

    /// Publish `payload` to `topic`.  Failures are reported, never retried
    /// here — the next recovery cycle heals the session.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError>;

    /// Service the connection and hand out **at most one** pending inbound
    /// command.  Unrecognized topics never surface here.
    fn poll(&mut self) -> Option<InboundCommand>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: domain → time source)
// ───────────────────────────────────────────────────────────────

/// Blocking time source.  The node's fixed waits (inter-sample idle,
/// reconnect back-off, servo settle) all run through this port so that
/// tests can observe cadence without sleeping.
pub trait Clock {
    /// Block for `period`.
    fn sleep(&mut self, period: Duration);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`MessagingChannel`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Session could not be opened (refused, unreachable, bad handshake).
    ConnectFailed,
    /// Broker rejected or never acknowledged a subscription.
    SubscribeFailed,
    /// Publish was not accepted by the transport.
    PublishFailed,
    /// Operation requires a session but none is open.
    NotConnected,
}

impl core::fmt::Display for CommsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::NotConnected => write!(f, "not connected"),
        }
    }
}
