//! A thin facade mapping the core wire-protocol client onto a generic,
//! host-language database interface shaped like Go's `database/sql/driver`
//! (Open/Close a Connection, Prepare, Query, Exec, Rows.Columns/Next,
//! BeginTx/Commit/Rollback, Ping).
//!
//! This module is deliberately minimal: it does no connection pooling, no
//! statement caching, and no retry/reconnect logic. Those concerns belong
//! to the host runtime that consumes this contract, not to this crate.

use crate::client::Client;
use crate::error::Result;
use crate::opts::ConnectionInfo;
use crate::rows::ResultHandle;
use crate::statement::PreparedStatement;
use crate::tx::Transaction;
use crate::value::Value;

/// The result of an `Exec`.
#[derive(Debug, Clone, Copy)]
pub struct ExecResult {
    rows_affected: i32,
}

impl ExecResult {
    /// Always `1`. The protocol this crate speaks does not report a real
    /// last-insert id; this is a documented caveat, not a bug, matching the
    /// behavior of the driver this adapter was modeled on.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        1
    }

    #[must_use]
    pub fn rows_affected(&self) -> i32 {
        self.rows_affected
    }
}

/// Rows produced by `Query`, adapted to the host contract's
/// Columns/Next shape.
pub struct Rows<'a> {
    client: &'a mut Client,
    handle: ResultHandle,
}

impl<'a> Rows<'a> {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.handle.columns()
    }

    /// Advances to the next row, writing its values into `dest`. Returns
    /// `false` once exhausted.
    pub fn next(&mut self, dest: &mut Vec<Value>) -> Result<bool> {
        match self.handle.next_row(self.client)? {
            Some(row) => {
                *dest = row;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn close(self) -> Result<()> {
        self.handle.close(self.client)
    }
}

/// A prepared statement, adapted to the host contract's Statement shape.
pub struct Statement {
    inner: PreparedStatement,
}

impl Statement {
    #[must_use]
    pub fn num_input(&self) -> usize {
        self.inner.num_params()
    }

    pub fn query<'a>(&mut self, conn: &'a mut Connection) -> Result<Rows<'a>> {
        let handle = conn.client.execute_query(&mut self.inner)?;
        Ok(Rows { client: &mut conn.client, handle })
    }

    pub fn exec(&mut self, conn: &mut Connection, args: &[Value]) -> Result<ExecResult> {
        let rows_affected = conn.client.execute_update(&self.inner, args)?;
        Ok(ExecResult { rows_affected })
    }

    pub fn close(self, conn: &mut Connection) -> Result<()> {
        conn.client.close_statement(&self.inner)
    }
}

/// A database connection, adapted to the host contract's Connection shape.
pub struct Connection {
    client: Client,
}

impl Connection {
    /// `Open(dsn)`.
    pub fn open(dsn: &str) -> Result<Self> {
        Ok(Self { client: Client::connect_dsn(dsn)? })
    }

    pub fn open_with(info: ConnectionInfo) -> Result<Self> {
        Ok(Self { client: Client::connect(info)? })
    }

    /// `Prepare(sql)`.
    pub fn prepare(&mut self, sql: &str) -> Result<Statement> {
        let inner = self.client.prepare_params(sql)?;
        Ok(Statement { inner })
    }

    /// `Query(sql, args)`, preparing and binding in one step. Parameters are
    /// not bound through the wire protocol's query path in this spec (see
    /// the execute-update parameter binding instead); `args` is accepted for
    /// contract parity and must be empty.
    pub fn query(&mut self, sql: &str, args: &[Value]) -> Result<Rows<'_>> {
        debug_assert!(args.is_empty(), "query-with-parameters is not supported by this protocol path");
        let mut inner = self.client.prepare(sql)?;
        let handle = self.client.execute_query(&mut inner)?;
        Ok(Rows { client: &mut self.client, handle })
    }

    /// `Exec(sql, args)`, preparing and binding in one step.
    pub fn exec(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        let inner = self.client.prepare_params(sql)?;
        let rows_affected = self.client.execute_update(&inner, args)?;
        self.client.close_statement(&inner)?;
        Ok(ExecResult { rows_affected })
    }

    /// `BeginTx`.
    pub fn begin_tx(&mut self) -> Result<Transaction> {
        self.client.begin()
    }

    pub fn commit(&mut self, tx: Transaction) -> Result<()> {
        tx.commit(&mut self.client)
    }

    pub fn rollback(&mut self, tx: Transaction) -> Result<()> {
        tx.rollback(&mut self.client)
    }

    /// `Ping`, implemented as `SELECT 1`.
    pub fn ping(&mut self) -> Result<()> {
        self.client.ping()
    }

    /// `Close`.
    pub fn close(self) -> Result<()> {
        self.client.close()
    }
}
