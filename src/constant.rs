//! Session-protocol command tags and status codes.
//!
//! These are wire constants: the discriminant values are part of the
//! protocol and must match the server exactly.

/// Command tags sent as the first `int32` of every session request.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Prepare = 0,
    Close = 1,
    ExecuteQuery = 2,
    ExecuteUpdate = 3,
    CommandClose = 4,
    FetchRows = 5,
    ResultReset = 6,
    ResultClose = 7,
    Commit = 8,
    ChangeId = 9,
    GetMeta = 10,
    PrepareParams = 11,
    SetId = 12,
    Cancel = 13,
    CheckKey = 14,
    SetAutocommit = 15,
    HasPendingTransaction = 16,
    LobRead = 17,
    PrepareParams2 = 18,
}

/// Status codes the server returns as the leading `int32` of a response.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Error = 0,
    Ok = 1,
    Closed = 2,
    OkStateChanged = 3,
}

impl Status {
    #[must_use]
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Status::Error),
            1 => Some(Status::Ok),
            2 => Some(Status::Closed),
            3 => Some(Status::OkStateChanged),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok | Status::OkStateChanged)
    }
}

/// Minimum and maximum client protocol versions advertised during handshake.
pub const CLIENT_VERSION_MIN: i32 = 9;
pub const CLIENT_VERSION_MAX: i32 = 19;

pub const DEFAULT_PORT: u16 = 9092;
pub const DEFAULT_MAX_ROWS: i32 = 200;
pub const DEFAULT_FETCH_SIZE: i32 = 64;
