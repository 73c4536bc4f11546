//! Transaction control.

use crate::client::Client;
use crate::error::Result;

/// A transaction on an H2 connection.
///
/// This is a zero-sized marker, not a stored borrow: the connection is
/// passed explicitly to [`Transaction::commit`] and [`Transaction::rollback`]
/// so there is no self-referential handle to the Client to manage.
#[derive(Debug)]
pub struct Transaction;

impl Transaction {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Commits the transaction and restores autocommit.
    pub fn commit(self, client: &mut Client) -> Result<()> {
        client.exec_sql("COMMIT")?;
        client.set_autocommit(true)?;
        Ok(())
    }

    /// Rolls back the transaction and restores autocommit.
    pub fn rollback(self, client: &mut Client) -> Result<()> {
        client.exec_sql("ROLLBACK")?;
        client.set_autocommit(true)?;
        Ok(())
    }
}
