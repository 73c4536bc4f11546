//! The session-level command state machine: handshake, prepare, execute,
//! fetch, close, commit/rollback, autocommit.

use log::{debug, warn};

use crate::constant::{Command, Status, CLIENT_VERSION_MAX, CLIENT_VERSION_MIN, DEFAULT_FETCH_SIZE, DEFAULT_MAX_ROWS};
use crate::error::{Error, Result, ServerSqlError};
use crate::opts::ConnectionInfo;
use crate::statement::{ParamMeta, PreparedStatement};
use crate::transport::Transport;
use crate::value::{Kind, Value};

/// Owns the monotonic identifier allocator for one TCP connection. One
/// `Session` per [`crate::client::Client`], for the connection's whole
/// lifetime.
#[derive(Debug, Default)]
pub struct Session {
    seq_id: i32,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self { seq_id: 0 }
    }

    fn alloc_id(&mut self) -> i32 {
        self.seq_id += 1;
        self.seq_id
    }

    /// Performs the login handshake. Must be the first exchange on a fresh
    /// Transport.
    pub fn handshake(&mut self, t: &mut Transport, info: &ConnectionInfo) -> Result<()> {
        let password_hash = crate::auth::password_hash(&info.user, &info.password);

        t.write_i32(CLIENT_VERSION_MIN)?;
        t.write_i32(CLIENT_VERSION_MAX)?;
        t.write_string(&info.database)?;
        t.write_string(&format!("jdbc:h2:{}", info.database))?;
        t.write_string(&info.user)?;
        t.write_bytes(Some(&password_hash))?;
        t.write_bytes(None)?;
        t.write_i32(0)?;
        t.flush()?;

        let status = t.read_i32()?;
        let server_version = t.read_i32()?;
        if status != Status::Ok as i32 {
            return Err(Error::Handshake(status));
        }
        debug!("handshake ok, server echoed client version {server_version}");
        Ok(())
    }

    /// `PREPARE`: registers SQL text without parameter metadata.
    pub fn prepare(&mut self, t: &mut Transport, sql: &str) -> Result<PreparedStatement> {
        let id = self.alloc_id();
        debug!("PREPARE id={id}");
        t.write_i32(Command::Prepare as i32)?;
        t.write_i32(id)?;
        t.write_string(sql)?;
        t.flush()?;

        check_status(t)?;
        let is_query = t.read_bool()?;
        let is_read_only = t.read_bool()?;
        let num_params = t.read_i32()?;

        Ok(PreparedStatement {
            id,
            object_id: None,
            sql: sql.to_string(),
            is_query,
            is_read_only,
            num_params: usize::try_from(num_params).unwrap_or(0),
            params: Vec::new(),
        })
    }

    /// `PREPARE_PARAMS2`: registers SQL text and returns parameter kind
    /// metadata, needed before an `execute_update` so temporal parameters
    /// can be routed to the right wire kind.
    pub fn prepare_params2(&mut self, t: &mut Transport, sql: &str) -> Result<PreparedStatement> {
        let id = self.alloc_id();
        debug!("PREPARE_PARAMS2 id={id}");
        t.write_i32(Command::PrepareParams2 as i32)?;
        t.write_i32(id)?;
        t.write_string(sql)?;
        t.flush()?;

        check_status(t)?;
        let is_query = t.read_bool()?;
        let is_read_only = t.read_bool()?;
        let num_params = t.read_i32()?;
        let _command_type = t.read_i32()?;

        let mut params = Vec::with_capacity(usize::try_from(num_params).unwrap_or(0));
        for _ in 0..num_params {
            let kind_tag = t.read_i32()?;
            let kind = Kind::from_i32(kind_tag).ok_or(Error::UnknownValueKind(kind_tag))?;
            let precision = t.read_i64()?;
            let scale = t.read_i32()?;
            let nullable = ParamMeta::nullable_from_wire(t.read_i32()?);
            params.push(ParamMeta { kind, precision, scale, nullable });
        }

        Ok(PreparedStatement {
            id,
            object_id: None,
            sql: sql.to_string(),
            is_query,
            is_read_only,
            num_params: usize::try_from(num_params).unwrap_or(0),
            params,
        })
    }

    /// `EXEC_QUERY`: executes a prepared statement as a query, returning
    /// column labels and the server-reported row count. Row bodies are
    /// fetched lazily by [`crate::rows::ResultHandle`].
    pub fn execute_query(
        &mut self,
        t: &mut Transport,
        stmt: &mut PreparedStatement,
    ) -> Result<(Vec<String>, i32)> {
        let object_id = self.alloc_id();
        stmt.object_id = Some(object_id);
        debug!("EXEC_QUERY stmt={} obj={object_id}", stmt.id);

        t.write_i32(Command::ExecuteQuery as i32)?;
        t.write_i32(stmt.id)?;
        t.write_i32(object_id)?;
        t.write_i32(DEFAULT_MAX_ROWS)?;
        t.write_i32(DEFAULT_FETCH_SIZE)?;
        t.write_i32(0)?;
        t.flush()?;

        check_status(t)?;
        let column_count = t.read_i32()?;
        let row_count = t.read_i32()?;

        let mut columns = Vec::with_capacity(usize::try_from(column_count).unwrap_or(0));
        for _ in 0..column_count {
            let alias = t.read_string()?;
            let _schema = t.read_string()?;
            let _table = t.read_string()?;
            let column_name = t.read_string()?;
            let _value_type = t.read_i32()?;
            let _precision = t.read_i64()?;
            let _scale = t.read_i32()?;
            let _display_size = t.read_i32()?;
            let _autoincrement = t.read_bool()?;
            let _nullable = t.read_i32()?;
            columns.push(if alias.is_empty() { column_name } else { alias });
        }

        Ok((columns, row_count))
    }

    /// `EXEC_UPDATE`: binds parameters and executes a prepared statement as
    /// an update, returning the affected-row count.
    ///
    /// `values.len()` must equal `stmt.num_params`; this is checked before
    /// any bytes are written.
    pub fn execute_update(
        &mut self,
        t: &mut Transport,
        stmt: &PreparedStatement,
        values: &[Value],
    ) -> Result<i32> {
        if values.len() != stmt.num_params {
            return Err(Error::ParameterCount {
                expected: stmt.num_params,
                actual: values.len(),
            });
        }
        debug!("EXEC_UPDATE stmt={}", stmt.id);

        t.write_i32(Command::ExecuteUpdate as i32)?;
        t.write_i32(stmt.id)?;
        t.write_i32(i32::try_from(values.len()).unwrap_or(0))?;
        for (value, meta) in values.iter().zip(stmt.params.iter()) {
            value.write(t, Some(meta.kind))?;
        }
        // `stmt.params` is empty when the statement came from `prepare()`
        // rather than `prepare_params2()`; in that case every value is
        // written without temporal routing.
        for value in values.iter().skip(stmt.params.len()) {
            value.write(t, None)?;
        }
        t.write_i32(0)?;
        t.flush()?;

        check_status(t)?;
        let rows_updated = t.read_i32()?;
        let _autocommit_echo = t.read_bool()?;
        Ok(rows_updated)
    }

    /// `CLOSE` (statement-level `CMD_CLOSE`).
    pub fn close_statement(&mut self, t: &mut Transport, stmt: &PreparedStatement) -> Result<()> {
        t.write_i32(Command::CommandClose as i32)?;
        t.write_i32(stmt.id)?;
        t.flush()?;
        check_status(t)
    }

    /// `RESULT_CLOSE`.
    pub fn close_result(&mut self, t: &mut Transport, object_id: i32) -> Result<()> {
        t.write_i32(Command::ResultClose as i32)?;
        t.write_i32(object_id)?;
        t.flush()?;
        check_status(t)
    }

    /// `FETCH_ROWS`: pulls the next block of rows for a result set that was
    /// opened with a smaller initial fetch size than its total row count.
    /// Not used by [`crate::rows::ResultHandle`] directly (rows are
    /// streamed one at a time within the initial fetch), kept for parity
    /// with the protocol's own re-fetch path.
    pub fn fetch_rows(&mut self, t: &mut Transport, object_id: i32, count: i32) -> Result<()> {
        t.write_i32(Command::FetchRows as i32)?;
        t.write_i32(object_id)?;
        t.write_i32(count)?;
        t.flush()?;
        check_status(t)
    }

    /// `SET_AUTOCOMMIT`, the dedicated command taking no statement id.
    ///
    /// Not used by [`crate::client::Client::begin`]/[`crate::tx::Transaction`],
    /// which drive autocommit through an `execute-update` of literal SQL text
    /// (`SET AUTOCOMMIT TRUE`/`FALSE`) instead, matching how the session
    /// protocol's commit/rollback sequence is actually composed. Kept here
    /// for protocol completeness since `SET_AUTOCOMMIT` is part of the
    /// command tag enumeration.
    pub fn set_autocommit(&mut self, t: &mut Transport, enabled: bool) -> Result<()> {
        t.write_i32(Command::SetAutocommit as i32)?;
        t.write_bool(enabled)?;
        t.flush()?;
        check_status(t)
    }

    /// Session-level `CLOSE`, the last command issued before the socket is
    /// torn down.
    pub fn close_session(&mut self, t: &mut Transport) -> Result<()> {
        t.write_i32(Command::Close as i32)?;
        t.flush()?;
        check_status(t)
    }
}

/// Reads the leading status `int32` of a response. On anything other than
/// Ok/OkStateChanged, decodes and consumes the five-field server error
/// record so the Transport stays framed, then returns it as an `Err`.
fn check_status(t: &mut Transport) -> Result<()> {
    let raw = t.read_i32()?;
    if Status::from_i32(raw).is_some_and(Status::is_ok) {
        return Ok(());
    }
    let code_name = t.read_string()?;
    let message = t.read_string()?;
    let sql = t.read_string()?;
    let code_numeric = t.read_i32()?;
    let trace = t.read_string()?;
    let err = ServerSqlError { code_name, message, sql, code_numeric, trace };
    warn!("server error {}: {}", err.code_name, err.message);
    Err(Error::Server(err))
}
