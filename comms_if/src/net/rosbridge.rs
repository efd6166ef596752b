//! # rosbridge Client
//!
//! Speaks the rosbridge v2 JSON protocol over a websocket. Only the operations needed to publish
//! are implemented, the client never subscribes so nothing is read back from the server.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{net::TcpStream, sync::Mutex};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tungstenite::{stream::MaybeTlsStream, Message, WebSocket};

use super::{Bus, BusError};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A single rosbridge operation, serialised as one websocket text frame.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Op {
    Advertise {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },
    Publish {
        topic: String,
        msg: Value,
    },
    Unadvertise {
        topic: String,
    },
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A connection to a rosbridge server.
///
/// The connection is send-only. Nothing is ever read back, so anything the server sends is left
/// unprocessed in the socket buffer.
pub struct RosBridge {
    socket: Mutex<WebSocket<MaybeTlsStream<TcpStream>>>,

    url: String,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RosBridge {
    /// Connect to the bridge at `ws://{host}:{port}`.
    ///
    /// Blocks until the websocket handshake completes.
    pub fn connect(host: &str, port: u16) -> Result<Self, BusError> {
        let url = format!("ws://{}:{}", host, port);

        let (socket, _response) = tungstenite::connect(url.as_str())
            .map_err(|e| BusError::ConnectError(url.clone(), e))?;

        debug!("Connected to rosbridge at {}", url);

        Ok(Self {
            socket: Mutex::new(socket),
            url,
        })
    }

    /// The websocket URL of the bridge.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Close the websocket.
    ///
    /// Any further operation on the bridge will fail.
    pub fn close(&self) -> Result<(), BusError> {
        let mut socket = self.socket.lock().map_err(|_| BusError::Poisoned)?;

        match socket.close(None) {
            Ok(_) | Err(tungstenite::Error::ConnectionClosed) => (),
            Err(e) => return Err(BusError::SendError(e))
        }

        // Flush the close frame, the server closing first is not an error here
        match socket.flush() {
            Ok(_)
            | Err(tungstenite::Error::ConnectionClosed)
            | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(BusError::SendError(e))
        }
    }

    fn send(&self, op: &Op) -> Result<(), BusError> {
        let text = serde_json::to_string(op).map_err(BusError::SerializationError)?;

        let mut socket = self.socket.lock().map_err(|_| BusError::Poisoned)?;

        socket.send(Message::text(text)).map_err(BusError::SendError)
    }
}

impl Bus for RosBridge {
    fn advertise(&self, topic: &str, msg_type: &str) -> Result<(), BusError> {
        self.send(&Op::Advertise {
            topic: topic.into(),
            msg_type: msg_type.into(),
        })
    }

    fn publish(&self, topic: &str, msg: Value) -> Result<(), BusError> {
        self.send(&Op::Publish {
            topic: topic.into(),
            msg,
        })
    }

    fn unadvertise(&self, topic: &str) -> Result<(), BusError> {
        self.send(&Op::Unadvertise {
            topic: topic.into(),
        })
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
