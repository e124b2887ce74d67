//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter | Implements                     | Connects to              |
//! |---------|--------------------------------|--------------------------|
//! | `clock` | Clock                          | OS thread sleep          |
//! | `mqtt`  | MessagingChannel               | MQTT 3.1.1 broker (TCP)  |
//! | `sim`   | SensorGateway, ActuatorPanel,  | In-memory kitchen bench  |
//! |         | StatusDisplay                  |                          |

pub mod clock;
pub mod mqtt;
pub mod sim;
