//! Prepared statement handles.

use crate::value::Kind;

/// Metadata for one bind parameter, only available after a
/// [`crate::constant::Command::PrepareParams2`] prepare.
#[derive(Debug, Clone, Copy)]
pub struct ParamMeta {
    pub kind: Kind,
    pub precision: i64,
    pub scale: i32,
    pub nullable: bool,
}

impl ParamMeta {
    pub(crate) fn nullable_from_wire(v: i32) -> bool {
        v == 1
    }
}

/// A statement registered with the server via `PREPARE` or `PREPARE_PARAMS2`.
///
/// Carries no transport reference of its own: every operation that needs
/// the wire takes `&mut Client` explicitly (see [`crate::client::Client`]),
/// since the statement and the connection it belongs to cannot outlive one
/// another and Rust has no convenient way to express that cycle as owned
/// fields.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    pub(crate) id: i32,
    pub(crate) object_id: Option<i32>,
    pub sql: String,
    pub is_query: bool,
    pub is_read_only: bool,
    pub num_params: usize,
    pub params: Vec<ParamMeta>,
}

impl PreparedStatement {
    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[must_use]
    pub fn num_params(&self) -> usize {
        self.num_params
    }

    #[must_use]
    pub fn params(&self) -> &[ParamMeta] {
        &self.params
    }
}
