//! Mock bench, broker link and clock for integration tests.
//!
//! The bench records every actuator call so tests can assert on the full
//! command history; the link records every publish and plays back scripted
//! failures; the clock records every sleep instead of waiting.

use std::collections::VecDeque;
use std::time::Duration;

use kitchenguard::app::commands::InboundCommand;
use kitchenguard::app::ports::{
    ActuatorPanel, Clock, CommsError, Credentials, MessagingChannel, SensorGateway, StatusDisplay,
};
use kitchenguard::display::DISPLAY_COLS;

// ── Panel call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCall {
    Indicator(bool),
    Alarm(bool),
    Position(u8),
}

// ── MockBench ─────────────────────────────────────────────────

/// Sensor, panel and display in one object, like the real bench.
pub struct MockBench {
    pub gas: u16,
    pub flame: u16,
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,

    pub panel_calls: Vec<PanelCall>,
    indicator: bool,
    alarm: bool,
    position: u8,

    frame: [[u8; DISPLAY_COLS]; 2],
    pub clears: u32,
    /// Every `write_at` call as (row, col, text).
    pub writes: Vec<(u8, u8, String)>,
}

#[allow(dead_code)]
impl MockBench {
    /// A quiet kitchen: everything well inside the safe band.
    pub fn safe() -> Self {
        Self {
            gas: 500,
            flame: 3500,
            temperature: Some(25.0),
            humidity: Some(40.0),
            panel_calls: Vec::new(),
            indicator: false,
            alarm: false,
            position: 0,
            frame: [[b' '; DISPLAY_COLS]; 2],
            clears: 0,
            writes: Vec::new(),
        }
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    /// Most recent servo command, if any.
    pub fn last_position_call(&self) -> Option<u8> {
        self.panel_calls.iter().rev().find_map(|c| match c {
            PanelCall::Position(a) => Some(*a),
            _ => None,
        })
    }

    pub fn position_was_commanded(&self) -> bool {
        self.last_position_call().is_some()
    }

    /// One display line rendered as text, trailing blanks trimmed.
    pub fn line(&self, row: usize) -> String {
        let text: String = self.frame[row].iter().map(|&b| b as char).collect();
        text.trim_end().to_string()
    }

    /// Untrimmed display line, all 16 cells.
    pub fn raw_line(&self, row: usize) -> String {
        self.frame[row].iter().map(|&b| b as char).collect()
    }
}

impl SensorGateway for MockBench {
    fn gas_level(&mut self) -> u16 {
        self.gas
    }

    fn flame_level(&mut self) -> u16 {
        self.flame
    }

    fn temperature_c(&mut self) -> Option<f32> {
        self.temperature
    }

    fn humidity_pct(&mut self) -> Option<f32> {
        self.humidity
    }
}

impl ActuatorPanel for MockBench {
    fn set_indicator(&mut self, on: bool) {
        self.panel_calls.push(PanelCall::Indicator(on));
        self.indicator = on;
    }

    fn set_alarm(&mut self, on: bool) {
        self.panel_calls.push(PanelCall::Alarm(on));
        self.alarm = on;
    }

    fn set_position(&mut self, angle: u8) {
        self.panel_calls.push(PanelCall::Position(angle));
        self.position = angle;
    }

    fn indicator_on(&self) -> bool {
        self.indicator
    }

    fn alarm_on(&self) -> bool {
        self.alarm
    }
}

impl StatusDisplay for MockBench {
    fn clear(&mut self) {
        self.frame = [[b' '; DISPLAY_COLS]; 2];
        self.clears += 1;
    }

    fn write_at(&mut self, row: u8, col: u8, text: &str) {
        self.writes.push((row, col, text.to_string()));
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
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Scriptable broker link.  `fail_connects` / `fail_subscribes` are
/// consumed one per failing call; publishes and subscriptions are
/// recorded in order.
pub struct MockLink {
    pub connected: bool,
    pub fail_connects: u32,
    pub fail_subscribes: u32,
    pub fail_publishes: bool,

    pub connect_calls: u32,
    pub identities: Vec<String>,
    pub subscribed: Vec<String>,
    pub published: Vec<(String, String)>,
    pub inbound: VecDeque<InboundCommand>,
}

#[allow(dead_code)]
impl MockLink {
    /// Starts disconnected, everything succeeding.
    pub fn new() -> Self {
        Self {
            connected: false,
            fail_connects: 0,
            fail_subscribes: 0,
            fail_publishes: false,
            connect_calls: 0,
            identities: Vec::new(),
            subscribed: Vec::new(),
            published: Vec::new(),
            inbound: VecDeque::new(),
        }
    }

    /// Starts with a live, fully subscribed session, as after a clean
    /// first recovery.
    pub fn connected() -> Self {
        let mut link = Self::new();
        link.connected = true;
        link.subscribed = vec!["led".into(), "servo".into(), "buzzer".into()];
        link
    }

    /// All payloads published to `topic`, in order.
    pub fn published_on(&self, topic: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
            .collect()
    }
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagingChannel for MockLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, identity: &str, _credentials: &Credentials<'_>) -> Result<(), CommsError> {
        self.connect_calls += 1;
        // A fresh session never inherits old subscriptions.
        self.subscribed.clear();
        self.connected = false;
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            return Err(CommsError::ConnectFailed);
        }
        self.identities.push(identity.to_string());
        self.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::NotConnected);
        }
        if self.fail_subscribes > 0 {
            self.fail_subscribes -= 1;
            return Err(CommsError::SubscribeFailed);
        }
        self.subscribed.push(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::NotConnected);
        }
        if self.fail_publishes {
            return Err(CommsError::PublishFailed);
        }
        self.published.push((topic.to_string(), payload.to_string()));
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundCommand> {
        self.inbound.pop_front()
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Records every requested sleep without waiting.
#[derive(Debug, Default)]
pub struct MockClock {
    pub sleeps: Vec<Duration>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Clock for MockClock {
    fn sleep(&mut self, period: Duration) {
        self.sleeps.push(period);
    }
}
