//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the KitchenGuard node:
//! the sample/classify/actuate cycle and the inbound command protocol.
//! All interaction with sensors, actuators, the display and the broker
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals or a live broker.

pub mod commands;
pub mod ports;
pub mod service;
