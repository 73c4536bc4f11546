//! Streaming result rows.

use crate::client::Client;
use crate::error::Result;
use crate::value::Value;

/// A result set returned by `EXEC_QUERY`.
///
/// Rows are not read eagerly: each call to [`ResultHandle::next_row`] pulls
/// exactly one "has-next" flag plus, if present, one row's worth of values
/// off the transport. Dropping a handle with unread rows leaves the
/// connection's framing in a state the next command on the same session
/// cannot safely consume; callers MUST exhaust or explicitly discard it via
/// [`ResultHandle::close`] before issuing another command.
#[derive(Debug)]
pub struct ResultHandle {
    pub(crate) object_id: i32,
    columns: Vec<String>,
    row_count: i32,
    cursor: i32,
    exhausted: bool,
}

impl ResultHandle {
    pub(crate) fn new(object_id: i32, columns: Vec<String>, row_count: i32) -> Self {
        Self {
            object_id,
            columns,
            row_count,
            cursor: 0,
            exhausted: row_count == 0,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn row_count(&self) -> i32 {
        self.row_count
    }

    /// Pulls the next row, if any. Returns `Ok(None)` once the stream is
    /// exhausted; subsequent calls keep returning `Ok(None)`.
    pub fn next_row(&mut self, client: &mut Client) -> Result<Option<Vec<Value>>> {
        if self.exhausted || self.cursor >= self.row_count {
            self.exhausted = true;
            return Ok(None);
        }
        self.cursor += 1;
        let has_next = client.transport.read_bool()?;
        if !has_next {
            self.exhausted = true;
            return Ok(None);
        }
        let mut row = Vec::with_capacity(self.columns.len());
        for _ in 0..self.columns.len() {
            row.push(Value::read(&mut client.transport)?);
        }
        Ok(Some(row))
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Discards any unread rows and resynchronizes the Transport.
    pub fn close(self, client: &mut Client) -> Result<()> {
        client.close_result(&self)
    }
}
