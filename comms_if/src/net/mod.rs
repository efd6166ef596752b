//! # Network Module
//!
//! This module provides the message bus abstraction used to command the robot. The robot is
//! reached through a rosbridge server, so a bus here is anything which can advertise, publish to
//! and unadvertise ROS topics. Publishing is fire-and-forget, no acknowledgement is expected.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// In-memory bus which records every operation, used in tests
pub mod record;

/// rosbridge v2 websocket client
pub mod rosbridge;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{marker::PhantomData, sync::Arc};
use serde_json::Value;

use crate::msg::RosMessage;

// Exports
pub use record::RecordingBus;
pub use rosbridge::{Op, RosBridge};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A message bus connected to the robot.
///
/// Implementations must be shareable between the driver threads.
pub trait Bus: Send + Sync {
    /// Announce that this client will publish `msg_type` messages on `topic`.
    fn advertise(&self, topic: &str, msg_type: &str) -> Result<(), BusError>;

    /// Publish a message on a previously advertised topic.
    fn publish(&self, topic: &str, msg: Value) -> Result<(), BusError>;

    /// Withdraw a previous advertisement.
    fn unadvertise(&self, topic: &str) -> Result<(), BusError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A typed handle to an advertised topic.
pub struct Topic<M> {
    bus: Arc<dyn Bus>,

    name: String,

    _msg: PhantomData<fn(M)>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum BusError {
    #[error("Could not connect to the bridge at {0}: {1}")]
    ConnectError(String, tungstenite::Error),

    #[error("Could not send to the bridge: {0}")]
    SendError(tungstenite::Error),

    #[error("Could not serialize the message: {0}")]
    SerializationError(serde_json::Error),

    #[error("The bridge connection lock was poisoned by a panicking thread")]
    Poisoned,

    #[error("The bus rejected the operation on {0}")]
    Rejected(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<M: RosMessage> Topic<M> {
    /// Advertise `name` on the bus and return a handle for publishing to it.
    pub fn advertise<S: Into<String>>(bus: Arc<dyn Bus>, name: S) -> Result<Self, BusError> {
        let name = name.into();

        bus.advertise(&name, M::TYPE)?;

        Ok(Self {
            bus,
            name,
            _msg: PhantomData,
        })
    }

    /// The full name of the topic.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn publish(&self, msg: &M) -> Result<(), BusError> {
        let val = serde_json::to_value(msg).map_err(BusError::SerializationError)?;

        self.bus.publish(&self.name, val)
    }

    pub fn unadvertise(&self) -> Result<(), BusError> {
        self.bus.unadvertise(&self.name)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
