//! Socket operation codes.
//!
//! Every frame on the wire carries one of these in its `op` field. The
//! numeric values are fixed by the protocol; note the gap at 8-9.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which side of the connection is allowed to send an op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Client,
    Server,
    /// Heartbeats flow in both directions.
    Either,
}

/// Frame operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Server delivers a named event.
    Dispatch = 0,
    /// Keepalive ping carrying the last seen sequence.
    Heartbeat = 1,
    /// Client authenticates a fresh session.
    Identify = 2,
    /// Client updates its own status.
    PresenceUpdate = 3,
    /// Client resumes a dropped session.
    Resume = 4,
    /// Server asks the client to reconnect.
    Reconnect = 5,
    /// Client requests offline guild members.
    RequestMembers = 6,
    /// Server rejects the session.
    InvalidSession = 7,
    /// First frame after connect, carries the heartbeat interval.
    Hello = 10,
    /// Server acknowledges a heartbeat.
    HeartbeatAck = 11,
}

impl OpCode {
    /// Raw wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Which peer may send this op.
    #[must_use]
    pub const fn origin(self) -> Origin {
        match self {
            Self::Heartbeat => Origin::Either,
            Self::Identify | Self::PresenceUpdate | Self::Resume | Self::RequestMembers => {
                Origin::Client
            }
            Self::Dispatch
            | Self::Reconnect
            | Self::InvalidSession
            | Self::Hello
            | Self::HeartbeatAck => Origin::Server,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dispatch => "Dispatch",
            Self::Heartbeat => "Heartbeat",
            Self::Identify => "Identify",
            Self::PresenceUpdate => "PresenceUpdate",
            Self::Resume => "Resume",
            Self::Reconnect => "Reconnect",
            Self::RequestMembers => "RequestMembers",
            Self::InvalidSession => "InvalidSession",
            Self::Hello => "Hello",
            Self::HeartbeatAck => "HeartbeatAck",
        }
    }
}

/// Error for wire values that map to no known op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown op code: {0}")]
pub struct UnknownOpCode(pub u8);

impl TryFrom<u8> for OpCode {
    type Error = UnknownOpCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let op = match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            3 => Self::PresenceUpdate,
            4 => Self::Resume,
            5 => Self::Reconnect,
            6 => Self::RequestMembers,
            7 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => return Err(UnknownOpCode(other)),
        };
        Ok(op)
    }
}

impl Serialize for OpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::try_from(u8::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
