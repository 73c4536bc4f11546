//! The connection-level facade gluing Transport, Session, and configuration
//! together.

use std::time::Duration;

use log::debug;

use crate::error::Result;
use crate::opts::ConnectionInfo;
use crate::rows::ResultHandle;
use crate::session::Session;
use crate::statement::PreparedStatement;
use crate::transport::Transport;
use crate::tx::Transaction;
use crate::value::Value;

/// One logical connection to an H2 server: a Transport, a Session, and the
/// ConnectionInfo it was opened with.
///
/// Not `Clone` and not `Sync` by design: a single Client may not be driven
/// concurrently (see the concurrency model: commands are strictly
/// request-then-response on one Transport).
#[derive(Debug)]
pub struct Client {
    pub(crate) transport: Transport,
    session: Session,
    info: ConnectionInfo,
}

impl Client {
    /// Opens a TCP connection and performs the login handshake.
    pub fn connect(info: ConnectionInfo) -> Result<Self> {
        let mut transport = Transport::connect(
            &info.host,
            info.port,
            info.tcp_nodelay,
            info.connect_timeout,
        )?;
        let mut session = Session::new();
        session.handshake(&mut transport, &info)?;
        debug!("connected to {}:{}/{}", info.host, info.port, info.database);
        Ok(Self { transport, session, info })
    }

    /// Opens a connection from a DSN string, see [`ConnectionInfo`].
    pub fn connect_dsn(dsn: &str) -> Result<Self> {
        Self::connect(ConnectionInfo::try_from(dsn)?)
    }

    #[must_use]
    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    /// Registers `sql` with the server, without parameter metadata.
    pub fn prepare(&mut self, sql: &str) -> Result<PreparedStatement> {
        self.session.prepare(&mut self.transport, sql)
    }

    /// Registers `sql` with the server, with parameter kind metadata. Use
    /// this before [`Client::execute_update`] so temporal parameters are
    /// routed to the wire kind the server expects.
    pub fn prepare_params(&mut self, sql: &str) -> Result<PreparedStatement> {
        self.session.prepare_params2(&mut self.transport, sql)
    }

    /// Executes a prepared statement as a query and returns a streaming
    /// result handle.
    pub fn execute_query(&mut self, stmt: &mut PreparedStatement) -> Result<ResultHandle> {
        let (columns, row_count) = self.session.execute_query(&mut self.transport, stmt)?;
        Ok(ResultHandle::new(stmt.object_id.unwrap_or(0), columns, row_count))
    }

    /// Executes a prepared statement as an update and returns the
    /// affected-row count.
    pub fn execute_update(&mut self, stmt: &PreparedStatement, values: &[Value]) -> Result<i32> {
        self.session.execute_update(&mut self.transport, stmt, values)
    }

    /// Closes a result set, discarding any unread rows.
    pub fn close_result(&mut self, handle: &ResultHandle) -> Result<()> {
        self.session.close_result(&mut self.transport, handle.object_id)
    }

    /// Closes a prepared statement.
    pub fn close_statement(&mut self, stmt: &PreparedStatement) -> Result<()> {
        self.session.close_statement(&mut self.transport, stmt)
    }

    /// A connectivity check, implemented as `SELECT 1` since the protocol
    /// offers no dedicated ping command.
    pub fn ping(&mut self) -> Result<()> {
        let mut stmt = self.prepare("SELECT 1")?;
        let mut rows = self.execute_query(&mut stmt)?;
        rows.next_row(self)?;
        self.close_result(&rows)?;
        self.close_statement(&stmt)
    }

    /// Begins a transaction by disabling autocommit, via an `execute-update`
    /// of the literal SQL `SET AUTOCOMMIT FALSE` (not the dedicated
    /// `SET_AUTOCOMMIT` command tag, see [`Client::set_autocommit`]). The
    /// returned [`Transaction`] restores it on commit or rollback.
    pub fn begin(&mut self) -> Result<Transaction> {
        self.set_autocommit(false)?;
        Ok(Transaction::new())
    }

    pub(crate) fn exec_sql(&mut self, sql: &str) -> Result<i32> {
        let stmt = self.session.prepare_params2(&mut self.transport, sql)?;
        let result = self.session.execute_update(&mut self.transport, &stmt, &[])?;
        self.session.close_statement(&mut self.transport, &stmt)?;
        Ok(result)
    }

    /// Toggles autocommit via an `execute-update` of literal SQL text
    /// (`SET AUTOCOMMIT TRUE`/`FALSE`), matching the sequence the session
    /// protocol actually drives it with rather than the standalone
    /// `SET_AUTOCOMMIT` command tag.
    pub(crate) fn set_autocommit(&mut self, enabled: bool) -> Result<()> {
        self.exec_sql(if enabled { "SET AUTOCOMMIT TRUE" } else { "SET AUTOCOMMIT FALSE" })?;
        Ok(())
    }

    /// Closes the session and the underlying socket.
    pub fn close(mut self) -> Result<()> {
        self.session.close_session(&mut self.transport)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.info.connect_timeout
    }
}
