//! Inbound command protocol: topics, channels and payload conventions.
//!
//! The supervisor side addresses the node over three command topics.  Raw
//! topic strings are parsed into [`CommandChannel`] exactly once, at the
//! messaging boundary — the core never compares topic strings, so a typo
//! in one place cannot split the protocol in two.
//!
//! Payload conventions (shared by every adapter and every test):
//! - switch channels: the payload `"ON"` (exact, after trimming) switches
//!   on, anything else switches off;
//! - the position channel: base-10 integer, unparsable text counts as 0,
//!   the result is clamped to 0..=180.

/// Inbound topic for the indicator LED.
pub const TOPIC_INDICATOR: &str = "led";
/// Confirmation topic for the indicator LED.
pub const TOPIC_INDICATOR_CONFIRM: &str = "led/confirm";
/// Inbound topic for the vent servo.
pub const TOPIC_POSITION: &str = "servo";
/// Confirmation topic for the vent servo.
pub const TOPIC_POSITION_CONFIRM: &str = "servo/confirm";
/// Inbound topic for the buzzer.
pub const TOPIC_ALARM: &str = "buzzer";
/// Confirmation topic for the buzzer.
pub const TOPIC_ALARM_CONFIRM: &str = "buzzer/confirm";
/// Outbound telemetry topic, published once per control cycle.
pub const TOPIC_TELEMETRY: &str = "sensors/data";

/// Every command topic the node subscribes to after (re)connecting.
pub const COMMAND_TOPICS: [&str; 3] = [TOPIC_INDICATOR, TOPIC_POSITION, TOPIC_ALARM];

/// Highest vent servo angle the node will command.
pub const MAX_POSITION_ANGLE: u8 = 180;

/// Capacity of the inbound command queue.  The loop drains one command per
/// cycle; a supervisor flooding faster than that loses the newest commands,
/// with a warning from the adapter.
pub const INBOUND_QUEUE_DEPTH: usize = 8;

/// Bounded queue the messaging adapters park deliveries in until the loop
/// polls them out.
pub type InboundQueue = heapless::Deque<InboundCommand, INBOUND_QUEUE_DEPTH>;

// ───────────────────────────────────────────────────────────────
// Command channel
// ───────────────────────────────────────────────────────────────

/// The closed set of channels a supervisor can command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandChannel {
    /// Indicator LED on/off.
    Indicator,
    /// Vent servo angle.
    Position,
    /// Buzzer on/off.
    Alarm,
}

impl CommandChannel {
    /// Map an inbound topic to its channel.  Unknown topics map to `None`
    /// and are dropped silently by the adapter.
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            TOPIC_INDICATOR => Some(Self::Indicator),
            TOPIC_POSITION => Some(Self::Position),
            TOPIC_ALARM => Some(Self::Alarm),
            _ => None,
        }
    }

    /// The topic this channel listens on.
    pub const fn topic(self) -> &'static str {
        match self {
            Self::Indicator => TOPIC_INDICATOR,
            Self::Position => TOPIC_POSITION,
            Self::Alarm => TOPIC_ALARM,
        }
    }

    /// The topic confirmations for this channel are published on.
    pub const fn confirm_topic(self) -> &'static str {
        match self {
            Self::Indicator => TOPIC_INDICATOR_CONFIRM,
            Self::Position => TOPIC_POSITION_CONFIRM,
            Self::Alarm => TOPIC_ALARM_CONFIRM,
        }
    }
}

/// One delivered command: the parsed channel plus the raw payload text.
/// Ephemeral — produced at the messaging boundary, consumed by the handler
/// in the same cycle, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub channel: CommandChannel,
    pub payload: String,
}

impl InboundCommand {
    pub fn new(channel: CommandChannel, payload: impl Into<String>) -> Self {
        Self {
            channel,
            payload: payload.into(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Payload conventions
// ───────────────────────────────────────────────────────────────

/// Switch-channel payload: `"ON"` after trimming means on, anything else
/// (including `"on"`) means off.
pub fn parse_switch(payload: &str) -> bool {
    payload.trim() == "ON"
}

/// Position-channel payload: base-10 integer, unparsable text counts as 0,
/// clamped into 0..=180.
pub fn parse_position(payload: &str) -> u8 {
    let raw: i32 = payload.trim().parse().unwrap_or(0);
    raw.clamp(0, i32::from(MAX_POSITION_ANGLE)) as u8
}

// ───────────────────────────────────────────────────────────────
