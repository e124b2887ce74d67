//! Outbound telemetry record.
//!
//! Serialized once per control cycle to the `sensors/data` topic.  Field
//! declaration order is the wire order, so the emitted JSON is always
//!
//! ```text
//! {"temp":…,"hum":…,"gas":…,"flame":…,"led":0|1,"buzzer":0|1,"servo":…,"status":"Danger"|"Normal"}
//! ```
//!
//! Absent climate readings serialize as `null` — a numeric stand-in could
//! mask a dead sensor on the supervisor side.

use serde::Serialize;

use crate::classifier::{DangerVerdict, SensorSnapshot};

/// Overall node status as the supervisor sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeStatus {
    Danger,
    Normal,
}

impl From<DangerVerdict> for NodeStatus {
    fn from(verdict: DangerVerdict) -> Self {
        if verdict.is_danger() {
            Self::Danger
        } else {
            Self::Normal
        }
    }
}

/// One cycle's outbound record.  No history is kept anywhere — only the
/// latest values matter to the supervisor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryMessage {
    pub temp: Option<f32>,
    pub hum: Option<f32>,
    pub gas: u16,
    pub flame: u16,
    pub led: u8,
    pub buzzer: u8,
    pub servo: u8,
    pub status: NodeStatus,
}

impl TelemetryMessage {
    /// Assemble the record from the cycle's snapshot and verdict plus the
    /// panel read-back.
    ///
    /// `reported_position` is the last *explicitly commanded* servo angle,
    /// not the panel's live angle — the two diverge whenever the control
    /// loop has moved the vent since the last position command.  Kept
    /// that way on purpose; see the tracker in
    /// [`NodeService`](crate::app::service::NodeService).
    pub fn new(
        snap: &SensorSnapshot,
        verdict: DangerVerdict,
        indicator_on: bool,
        alarm_on: bool,
        reported_position: u8,
    ) -> Self {
        Self {
            temp: snap.temperature_c,
            hum: snap.humidity_pct,
            gas: snap.gas_level,
            flame: snap.flame_level,
            led: u8::from(indicator_on),
            buzzer: u8::from(alarm_on),
            servo: reported_position,
            status: verdict.into(),
        }
    }

    /// Encode to the wire JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ───────────────────────────────────────────────────────────────
