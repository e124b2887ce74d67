//! Integration tests for inbound command handling: payload conventions,
//! confirmations, settle wait and interaction with the verdict sweep.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::mock_hw::{MockBench, MockClock, MockLink, PanelCall};

use kitchenguard::app::commands::{
    CommandChannel, InboundCommand, TOPIC_ALARM_CONFIRM, TOPIC_INDICATOR_CONFIRM,
    TOPIC_POSITION_CONFIRM,
};
use kitchenguard::app::ports::{
    ActuatorPanel, Clock, CommsError, Credentials, MessagingChannel,
};
use kitchenguard::app::service::{NodeService, SERVO_SETTLE};

const IDENTITY: &str = "ESP32Client";
const CREDS: Credentials<'static> = Credentials {
    username: "",
    password: "",
};

fn fixture() -> (NodeService, MockBench, MockLink, MockClock) {
    (
        NodeService::new(),
        MockBench::safe(),
        MockLink::connected(),
        MockClock::new(),
    )
}

fn command(channel: CommandChannel, payload: &str) -> InboundCommand {
    InboundCommand::new(channel, payload)
}

// ── Switch channels ───────────────────────────────────────────

#[test]
fn led_on_drives_panel_and_confirms() {
    let (mut node, mut bench, mut link, mut clock) = fixture();

    node.handle_command(
        command(CommandChannel::Indicator, "ON"),
        &mut bench,
        &mut link,
        &mut clock,
    );

    assert!(bench.indicator_on());
    assert_eq!(
        link.published,
        vec![(TOPIC_INDICATOR_CONFIRM.to_string(), "LED ON".to_string())]
    );
    assert!(clock.sleeps.is_empty(), "switch commands have no settle");
}

#[test]
fn anything_but_exact_on_switches_off() {
    for payload in ["OFF", "on", "", "1", "oN"] {
        let (mut node, mut bench, mut link, mut clock) = fixture();
        node.handle_command(
            command(CommandChannel::Indicator, payload),
            &mut bench,
            &mut link,
            &mut clock,
        );
        assert!(!bench.indicator_on(), "payload {payload:?} must mean off");
        assert_eq!(link.published_on(TOPIC_INDICATOR_CONFIRM), vec!["LED OFF"]);
    }
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let (mut node, mut bench, mut link, mut clock) = fixture();
    node.handle_command(
        command(CommandChannel::Alarm, "  ON \n"),
        &mut bench,
        &mut link,
        &mut clock,
    );
    assert!(bench.alarm_on());
    assert_eq!(link.published_on(TOPIC_ALARM_CONFIRM), vec!["Buzzer ON"]);
}

#[test]
fn buzzer_off_confirms_off() {
    let (mut node, mut bench, mut link, mut clock) = fixture();
    node.handle_command(
        command(CommandChannel::Alarm, "OFF"),
        &mut bench,
        &mut link,
        &mut clock,
    );
    assert!(!bench.alarm_on());
    assert_eq!(link.published_on(TOPIC_ALARM_CONFIRM), vec!["Buzzer OFF"]);
}

// ── Position channel ──────────────────────────────────────────

#[test]
fn servo_command_moves_waits_then_confirms() {
    let (mut node, mut bench, mut link, mut clock) = fixture();

    node.handle_command(
        command(CommandChannel::Position, "90"),
        &mut bench,
        &mut link,
        &mut clock,
    );

    assert_eq!(bench.last_position_call(), Some(90));
    assert_eq!(clock.sleeps, vec![SERVO_SETTLE]);
    assert_eq!(
        link.published_on(TOPIC_POSITION_CONFIRM),
        vec!["Servo moved to 90"]
    );
    assert_eq!(node.reported_position(), 90);
}

#[test]
fn out_of_range_angles_clamp_to_the_rail() {
    for (payload, angle) in [("200", 180u8), ("-5", 0), ("181", 180), ("0", 0)] {
        let (mut node, mut bench, mut link, mut clock) = fixture();
        node.handle_command(
            command(CommandChannel::Position, payload),
            &mut bench,
            &mut link,
            &mut clock,
        );
        assert_eq!(bench.last_position_call(), Some(angle), "payload {payload:?}");
        assert_eq!(
            link.published_on(TOPIC_POSITION_CONFIRM),
            vec![format!("Servo moved to {angle}").as_str()]
        );
    }
}

#[test]
fn non_numeric_angle_is_treated_as_zero() {
    let (mut node, mut bench, mut link, mut clock) = fixture();
    node.handle_command(
        command(CommandChannel::Position, "abc"),
        &mut bench,
        &mut link,
        &mut clock,
    );
    assert_eq!(bench.last_position_call(), Some(0));
    assert_eq!(
        link.published_on(TOPIC_POSITION_CONFIRM),
        vec!["Servo moved to 0"]
    );
}

/// Clock and link writing to one shared trace, so the order of waits
/// relative to publishes is observable.
struct TraceClock {
    trace: Rc<RefCell<Vec<String>>>,
}

impl Clock for TraceClock {
    fn sleep(&mut self, period: Duration) {
        self.trace
            .borrow_mut()
            .push(format!("sleep {}s", period.as_secs()));
    }
}

struct TraceLink {
    trace: Rc<RefCell<Vec<String>>>,
}

impl MessagingChannel for TraceLink {
    fn is_connected(&self) -> bool {
        true
    }

    fn connect(&mut self, _identity: &str, _credentials: &Credentials<'_>) -> Result<(), CommsError> {
        Ok(())
    }

    fn subscribe(&mut self, _topic: &str) -> Result<(), CommsError> {
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        self.trace
            .borrow_mut()
            .push(format!("publish {topic}: {payload}"));
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundCommand> {
        None
    }
}

#[test]
fn settle_wait_precedes_the_confirmation() {
    let trace = Rc::new(RefCell::new(Vec::new()));
    let mut bench = MockBench::safe();
    let mut link = TraceLink {
        trace: Rc::clone(&trace),
    };
    let mut clock = TraceClock {
        trace: Rc::clone(&trace),
    };
    let mut node = NodeService::new();

    node.handle_command(
        command(CommandChannel::Position, "137"),
        &mut bench,
        &mut link,
        &mut clock,
    );

    assert_eq!(
        *trace.borrow(),
        vec!["sleep 5s", "publish servo/confirm: Servo moved to 137"]
    );
}

// ── Commands inside the cycle ─────────────────────────────────

#[test]
fn at_most_one_command_is_serviced_per_cycle() {
    let (mut node, mut bench, mut link, mut clock) = fixture();
    link.inbound
        .push_back(command(CommandChannel::Indicator, "ON"));
    link.inbound.push_back(command(CommandChannel::Alarm, "ON"));

    node.run_cycle(&mut bench, &mut link, &mut clock, IDENTITY, &CREDS);
    assert_eq!(link.published_on(TOPIC_INDICATOR_CONFIRM).len(), 1);
    assert!(link.published_on(TOPIC_ALARM_CONFIRM).is_empty());
    assert_eq!(link.inbound.len(), 1, "second command waits its turn");

    node.run_cycle(&mut bench, &mut link, &mut clock, IDENTITY, &CREDS);
    assert_eq!(link.published_on(TOPIC_ALARM_CONFIRM).len(), 1);
    assert!(link.inbound.is_empty());
}

#[test]
fn verdict_sweep_overrides_a_manual_switch_in_the_same_cycle() {
    let (mut node, mut bench, mut link, mut clock) = fixture();
    link.inbound
        .push_back(command(CommandChannel::Indicator, "ON"));

    node.run_cycle(&mut bench, &mut link, &mut clock, IDENTITY, &CREDS);

    // Confirmation went out, but the safe verdict re-applied the panel
    // afterwards, so the LED ends the cycle off.
    assert_eq!(link.published_on(TOPIC_INDICATOR_CONFIRM), vec!["LED ON"]);
    assert!(!bench.indicator_on());

    let on_at = bench
        .panel_calls
        .iter()
        .position(|c| *c == PanelCall::Indicator(true))
        .expect("command never reached the panel");
    let off_at = bench
        .panel_calls
        .iter()
        .rposition(|c| *c == PanelCall::Indicator(false))
        .expect("sweep never reached the panel");
    assert!(on_at < off_at);
}
