//! Wire protocol between a room store client and the room server.
//!
//! One JSON request per WebSocket text frame, answered by exactly one response
//! carrying the same `id`.

use crate::domain::{RoomId, RoomRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoomRequest {
    pub id: u64,

    #[serde(flatten)]
    pub op: RoomOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RoomOp {
    /// Atomic create-if-absent
    Create {
        #[schemars(with = "String")]
        room: RoomId,
        record: RoomRecord,
    },

    Get {
        #[schemars(with = "String")]
        room: RoomId,
    },

    Remove {
        #[schemars(with = "String")]
        room: RoomId,
    },

    /// Delete the record when the requesting connection goes away
    RemoveOnDisconnect {
        #[schemars(with = "String")]
        room: RoomId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoomResponse {
    pub id: u64,

    #[serde(flatten)]
    pub result: RoomResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RoomResult {
    Created,
    Conflict,
    Record { record: Option<RoomRecord> },
    Removed,
    Armed,
    Error { message: String },
}

impl RoomRequest {
    pub fn new(id: u64, op: RoomOp) -> Self {
        Self { id, op }
    }
}

impl RoomResponse {
    pub fn new(id: u64, result: RoomResult) -> Self {
        Self { id, result }
    }
}
