//! Transaction scopes for repository work.
//!
//! # Responsibility
//! - `CallScope`: one savepoint per repository call, so multi-statement
//!   writes (join-table rewrites, cascading deletes) are atomic.
//! - `UnitOfWork`: an explicit transaction grouping several repository calls.
//!
//! # Invariants
//! - A scope that is dropped without `commit` rolls back everything it wrote.
//! - Call scopes nest inside a unit of work; releasing an inner savepoint
//!   does not make its writes durable until the outer transaction commits.

use super::DbResult;
use log::warn;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::ops::Deref;

const CALL_SAVEPOINT: &str = "repo_call";

/// Savepoint guard around a single repository call.
pub struct CallScope<'conn> {
    conn: &'conn Connection,
    released: bool,
}

impl<'conn> CallScope<'conn> {
    /// Opens a savepoint on `conn`.
    ///
    /// Outside of a transaction the savepoint starts one; inside a
    /// [`UnitOfWork`] it nests.
    pub fn begin(conn: &'conn Connection) -> DbResult<Self> {
        conn.execute_batch(&format!("SAVEPOINT {CALL_SAVEPOINT};"))?;
        Ok(Self {
            conn,
            released: false,
        })
    }

    /// Releases the savepoint, keeping its writes.
    pub fn commit(mut self) -> DbResult<()> {
        self.conn
            .execute_batch(&format!("RELEASE {CALL_SAVEPOINT};"))?;
        self.released = true;
        Ok(())
    }
}

impl Deref for CallScope<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.conn
    }
}

impl Drop for CallScope<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.conn.execute_batch(&format!(
            "ROLLBACK TO {CALL_SAVEPOINT}; RELEASE {CALL_SAVEPOINT};"
        )) {
            warn!("event=call_scope_rollback module=db status=error error={err}");
        }
    }
}

/// Explicit transaction spanning several repository calls.
///
/// Repositories accept `&Connection`; a unit of work derefs to the
/// connection of its open transaction, so any repository can be built on it:
///
/// ```no_run
/// # use university_core::db::{open_db_in_memory, UnitOfWork};
/// # use university_core::{CrudRepository, Person, SqliteStaffRepository, Staff};
/// let mut conn = open_db_in_memory()?;
/// let uow = UnitOfWork::begin(&mut conn)?;
/// let staff = SqliteStaffRepository::new(&uow);
/// staff.save(&Staff::new(Person::new("Ada", "Byron")))?;
/// uow.commit()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> UnitOfWork<'conn> {
    /// Starts an immediate transaction, taking the write lock up front.
    pub fn begin(conn: &'conn mut Connection) -> DbResult<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(Self { tx })
    }

    /// Commits all writes made through this unit of work.
    pub fn commit(self) -> DbResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    /// Discards all writes made through this unit of work.
    pub fn rollback(self) -> DbResult<()> {
        self.tx.rollback()?;
        Ok(())
    }

    /// Runs `work` in one transaction, committing on `Ok` and rolling back
    /// on `Err`.
    pub fn run<T, E>(
        conn: &'conn mut Connection,
        work: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<super::DbError>,
    {
        let uow = Self::begin(conn)?;
        match work(&uow) {
            Ok(value) => {
                uow.commit()?;
                Ok(value)
            }
            Err(err) => {
                uow.rollback()?;
                Err(err)
            }
        }
    }
}

impl Deref for UnitOfWork<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}
