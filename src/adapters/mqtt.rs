//! MQTT messaging adapter.
//!
//! Wraps the `rumqttc` synchronous client behind [`MessagingChannel`].
//! The node is single-threaded, so nothing pumps the event loop in the
//! background: every port call that needs broker I/O drives the loop
//! itself, and inbound command publishes observed along the way land in a
//! bounded queue for [`poll`](MessagingChannel::poll) to hand out.
//!
//! Session policy: `rumqttc` would happily reconnect on its own, but the
//! node's recovery cadence lives in [`session`](crate::session) — so the
//! first event-loop error kills the whole session object and the next
//! `connect` builds a fresh client with a clean state.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rumqttc::{
    Client, ConnectReturnCode, Connection, Event, MqttOptions, Outgoing, Packet, QoS,
    RecvTimeoutError, TryRecvError,
};

use crate::app::commands::{CommandChannel, InboundCommand, InboundQueue};
use crate::app::ports::{CommsError, Credentials, MessagingChannel};
use crate::config::NodeConfig;

/// How long to wait for the broker's CONNACK.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// How long to wait for a SUBACK.
const ACK_TIMEOUT: Duration = Duration::from_secs(5);
/// How long to let an outgoing publish reach the socket.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Request-channel capacity handed to the `rumqttc` client.
const REQUEST_CAPACITY: usize = 10;

/// MQTT 3.1.1 adapter over plain TCP.
pub struct MqttChannel {
    broker_host: String,
    broker_port: u16,
    keep_alive: Duration,
    session: Option<LiveSession>,
    inbound: InboundQueue,
}

/// A connected client plus its event loop handle.  Dropped whole on any
/// error, never half-reused.
struct LiveSession {
    client: Client,
    connection: Connection,
}

impl MqttChannel {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            broker_host: config.broker_host.clone(),
            broker_port: config.broker_port,
            keep_alive: Duration::from_secs(u64::from(config.keep_alive_secs)),
            session: None,
            inbound: InboundQueue::new(),
        }
    }
}

impl MessagingChannel for MqttChannel {
    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn connect(&mut self, identity: &str, credentials: &Credentials<'_>) -> Result<(), CommsError> {
        // Tear down any prior session first; its subscriptions die with it.
        if let Some(old) = self.session.take() {
            let _ = old.client.disconnect();
        }

        let mut options = MqttOptions::new(identity, &self.broker_host, self.broker_port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);
        if !credentials.username.is_empty() {
            options.set_credentials(credentials.username, credentials.password);
        }

        let (client, mut connection) = Client::new(options, REQUEST_CAPACITY);

        // Drive the event loop until the broker answers the CONNECT.
        let deadline = Instant::now() + CONNECT_TIMEOUT;
        loop {
            let now = Instant::now();
            if now >= deadline {
                debug!("no CONNACK within {CONNECT_TIMEOUT:?}");
                return Err(CommsError::ConnectFailed);
            }
            match connection.recv_timeout(deadline - now) {
                Ok(Ok(Event::Incoming(Packet::ConnAck(ack)))) => {
                    if ack.code == ConnectReturnCode::Success {
                        info!(
                            "connected to {}:{} as '{}'",
                            self.broker_host, self.broker_port, identity
                        );
                        self.session = Some(LiveSession { client, connection });
                        return Ok(());
                    }
                    warn!("broker refused connection: {:?}", ack.code);
                    return Err(CommsError::ConnectFailed);
                }
                Ok(Ok(_)) => {} // outgoing CONNECT, pings, etc.
                Ok(Err(e)) => {
                    debug!("connect event loop error: {e}");
                    return Err(CommsError::ConnectFailed);
                }
                Err(_) => return Err(CommsError::ConnectFailed),
            }
        }
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        let Self { session, inbound, .. } = self;
        let Some(live) = session.as_mut() else {
            return Err(CommsError::NotConnected);
        };
        let ok = live.client.subscribe(topic, QoS::AtMostOnce).is_ok()
            && live
                .pump_until(inbound, Instant::now() + ACK_TIMEOUT, |e| {
                    matches!(e, Event::Incoming(Packet::SubAck(_)))
                })
                .is_ok();
        if ok {
            debug!("subscribed to '{topic}'");
            Ok(())
        } else {
            warn!("subscribe to '{topic}' failed, dropping session");
            *session = None;
            Err(CommsError::SubscribeFailed)
        }
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        let Self { session, inbound, .. } = self;
        let Some(live) = session.as_mut() else {
            return Err(CommsError::NotConnected);
        };
        let ok = live
            .client
            .publish(topic, QoS::AtMostOnce, false, payload.as_bytes())
            .is_ok()
            && live
                .pump_until(inbound, Instant::now() + FLUSH_TIMEOUT, |e| {
                    matches!(e, Event::Outgoing(Outgoing::Publish(_)))
                })
                .is_ok();
        if ok {
            Ok(())
        } else {
            warn!("publish to '{topic}' failed, dropping session");
            *session = None;
            Err(CommsError::PublishFailed)
        }
    }

    fn poll(&mut self) -> Option<InboundCommand> {
        let Self { session, inbound, .. } = self;
        let mut dead = false;
        if let Some(live) = session.as_mut() {
            // Drain whatever the event loop already has.
            loop {
                match live.connection.try_recv() {
                    Ok(Ok(event)) => absorb(inbound, event),
                    Ok(Err(e)) => {
                        warn!("broker session lost: {e}");
                        dead = true;
                        break;
                    }
                    Err(TryRecvError::Disconnected) => {
                        dead = true;
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }
        }
        if dead {
            *session = None;
        }
        self.inbound.pop_front()
    }
}

impl LiveSession {
    /// Drive the event loop until `want` matches, the deadline passes, or
    /// the session dies.  Command publishes seen along the way are queued.
    fn pump_until(
        &mut self,
        inbound: &mut InboundQueue,
        deadline: Instant,
        want: impl Fn(&Event) -> bool,
    ) -> Result<(), PumpError> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(PumpError::TimedOut);
            }
            match self.connection.recv_timeout(deadline - now) {
                Ok(Ok(event)) => {
                    let matched = want(&event);
                    absorb(inbound, event);
                    if matched {
                        return Ok(());
                    }
                }
                Ok(Err(e)) => {
                    debug!("event loop error: {e}");
                    return Err(PumpError::SessionLost);
                }
                Err(RecvTimeoutError::Timeout) => return Err(PumpError::TimedOut),
                Err(RecvTimeoutError::Disconnected) => return Err(PumpError::SessionLost),
            }
        }
    }
}

enum PumpError {
    SessionLost,
    TimedOut,
}

/// Queue a command publish; everything else falls through.  A full queue
/// drops the newcomer, not the backlog.
fn absorb(inbound: &mut InboundQueue, event: Event) {
    if let Event::Incoming(Packet::Publish(publish)) = event {
        let Some(channel) = CommandChannel::from_topic(&publish.topic) else {
            debug!("ignoring publish on '{}'", publish.topic);
            return;
        };
        let payload = String::from_utf8_lossy(&publish.payload).into_owned();
        if inbound
            .push_back(InboundCommand::new(channel, payload))
            .is_err()
        {
            warn!("inbound queue full, dropping command on '{}'", publish.topic);
        }
    }
}

// ───────────────────────────────────────────────────────────────
