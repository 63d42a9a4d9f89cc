//! Generic SQLite repository over one entity table.
//!
//! # Responsibility
//! - Implement the read-only and CRUD contracts once for every entity that
//!   describes its table through [`Table`].
//! - Keep SQL assembly inside the repository boundary: only constant
//!   table/column names are ever formatted into statements, caller values
//!   are always bound parameters.
//!
//! # Invariants
//! - Every ordered query ends with `id ASC`, so ties are deterministic.
//! - Each write call runs inside its own savepoint ([`CallScope`]).

use super::contract::{CrudRepository, ReadOnlyRepository};
use super::error::{RepoError, RepoResult};
use super::paging::{Page, PageRequest, Sort};
use crate::db::migrations::{current_version, latest_version};
use crate::db::CallScope;
use crate::model::id::EntityId;
use log::{debug, info};
use rusqlite::types::ToSql;
use rusqlite::{params_from_iter, Connection, Params, Row};
use std::marker::PhantomData;

/// Mapping between an entity type and its table.
///
/// Implemented for `Student`, `Staff`, `Department` and `Course`.
pub trait Table: Clone + Sized {
    type Id: EntityId + ToSql;

    /// Table name, also used as the entity label in errors and logs.
    const NAME: &'static str;
    /// Columns of the entity's own row, `id` first.
    const COLUMNS: &'static [&'static str];

    /// Resolves a sort property path to a qualified column.
    fn sort_column(property: &str) -> Option<&'static str>;

    fn id(&self) -> Option<Self::Id>;

    /// Returns a copy of `self` carrying the store-assigned id.
    fn assigned(self, id: Self::Id) -> Self;

    /// Maps one row selected with [`select_sql`] into an entity, loading
    /// dependent join-table data through `conn`.
    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self>;

    /// Inserts or upserts the entity row and rewrites its join rows.
    fn write(&self, conn: &Connection) -> RepoResult<Self::Id>;

    /// Per-entity delete. Entities that own other rows cascade here.
    fn delete_row(conn: &Connection, id: Self::Id) -> RepoResult<usize> {
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", Self::NAME),
            [id],
        )?;
        Ok(changed)
    }
}

/// `SELECT <qualified columns> FROM <table>`, ready for joins and filters.
pub(crate) fn select_sql<T: Table>() -> String {
    let columns = T::COLUMNS
        .iter()
        .map(|column| format!("{table}.{column} AS {column}", table = T::NAME))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {columns} FROM {}", T::NAME)
}

/// Renders an `ORDER BY` clause, always ending with the id tiebreaker.
pub(crate) fn order_by_clause<T: Table>(sort: &Sort) -> RepoResult<String> {
    let id_column = format!("{}.id", T::NAME);
    let mut terms = Vec::with_capacity(sort.orders().len() + 1);
    let mut has_id = false;

    for order in sort.orders() {
        let column =
            T::sort_column(order.property.as_str()).ok_or_else(|| RepoError::UnknownSortProperty {
                entity: T::NAME,
                property: order.property.clone(),
            })?;
        has_id |= column == id_column;
        terms.push(format!("{column} {}", order.direction.as_sql()));
    }

    if !has_id {
        terms.push(format!("{id_column} ASC"));
    }

    Ok(format!(" ORDER BY {}", terms.join(", ")))
}

pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// SQLite-backed repository for one entity type.
///
/// Borrows the connection; building it on a [`crate::db::UnitOfWork`] puts
/// every call into that transaction.
pub struct SqliteRepository<'conn, T> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> T>,
}

impl<'conn, T: Table> SqliteRepository<'conn, T> {
    /// Wraps a migrated connection without checking it.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// Wraps a connection after checking schema version and table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready::<T>(conn)?;
        Ok(Self::new(conn))
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    /// Runs `sql` and maps every row.
    pub(crate) fn list<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(T::from_row(self.conn, row)?);
        }
        Ok(items)
    }

    /// Runs `sql` expecting at most one row.
    pub(crate) fn single<P: Params>(&self, sql: &str, params: P) -> RepoResult<Option<T>> {
        let mut items = self.list(sql, params)?;
        match items.len() {
            0 | 1 => Ok(items.pop()),
            count => Err(RepoError::NonUniqueResult {
                entity: T::NAME,
                count,
            }),
        }
    }

    /// Runs `sql` and keeps the first row, if any.
    pub(crate) fn first<P: Params>(&self, sql: &str, params: P) -> RepoResult<Option<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(T::from_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn count_where<P: Params>(&self, filter: &str, params: P) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE {filter};", T::NAME),
            params,
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Pages over `SELECT ... WHERE filter`, binding `binds` for the filter.
    pub(crate) fn page_where<V: ToSql>(
        &self,
        filter: &str,
        binds: &[V],
        request: &PageRequest,
    ) -> RepoResult<Page<T>> {
        if request.size == 0 {
            return Err(RepoError::InvalidPageRequest { size: request.size });
        }

        let total_elements = self.count_where(filter, params_from_iter(binds.iter()))?;
        let order = order_by_clause::<T>(&request.sort)?;
        let sql = format!(
            "{} WHERE {filter}{order} LIMIT {} OFFSET {};",
            select_sql::<T>(),
            request.size,
            request.offset()
        );
        let content = self.list(&sql, params_from_iter(binds.iter()))?;

        Ok(Page {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        })
    }

    fn delete_ids(&self, ids: &[T::Id]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM {} WHERE id IN ({});",
                T::NAME,
                placeholders(ids.len())
            ),
            params_from_iter(ids.iter()),
        )?;
        Ok(changed)
    }

    fn all_ids(&self, conn: &Connection) -> RepoResult<Vec<T::Id>> {
        let mut stmt = conn.prepare(&format!("SELECT id FROM {} ORDER BY id ASC;", T::NAME))?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(T::Id::from_raw(row.get(0)?));
        }
        Ok(ids)
    }
}

impl<T: Table> ReadOnlyRepository for SqliteRepository<'_, T> {
    type Entity = T;
    type Id = T::Id;

    fn find_by_id(&self, id: T::Id) -> RepoResult<Option<T>> {
        let sql = format!("{} WHERE {}.id = ?1;", select_sql::<T>(), T::NAME);
        self.first(&sql, [id])
    }

    fn find_all(&self) -> RepoResult<Vec<T>> {
        self.find_all_sorted(&Sort::unsorted())
    }

    fn find_all_by_id(&self, ids: &[T::Id]) -> RepoResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{} WHERE {}.id IN ({}) ORDER BY {}.id ASC;",
            select_sql::<T>(),
            T::NAME,
            placeholders(ids.len()),
            T::NAME
        );
        self.list(&sql, params_from_iter(ids.iter()))
    }

    fn find_all_sorted(&self, sort: &Sort) -> RepoResult<Vec<T>> {
        let sql = format!("{}{};", select_sql::<T>(), order_by_clause::<T>(sort)?);
        self.list(&sql, [])
    }

    fn find_page(&self, request: &PageRequest) -> RepoResult<Page<T>> {
        self.page_where::<i64>("1 = 1", &[], request)
    }

    fn count(&self) -> RepoResult<u64> {
        self.count_where("1 = 1", [])
    }

    fn exists_by_id(&self, id: T::Id) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);", T::NAME),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl<T: Table> CrudRepository for SqliteRepository<'_, T> {
    fn save(&self, entity: &T) -> RepoResult<T> {
        let scope = CallScope::begin(self.conn)?;
        let id = entity.write(&scope)?;
        scope.commit()?;

        info!(
            "event=repo_save module=repo entity={} status=ok id={} mode={}",
            T::NAME,
            id.raw(),
            if entity.id().is_some() { "upsert" } else { "insert" }
        );
        Ok(entity.clone().assigned(id))
    }

    fn save_all(&self, entities: &[T]) -> RepoResult<Vec<T>> {
        let scope = CallScope::begin(self.conn)?;
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            let id = entity.write(&scope)?;
            saved.push(entity.clone().assigned(id));
        }
        scope.commit()?;

        info!(
            "event=repo_save_all module=repo entity={} status=ok count={}",
            T::NAME,
            saved.len()
        );
        Ok(saved)
    }

    fn flush(&self) -> RepoResult<()> {
        // Statements execute synchronously; there is no write-behind buffer.
        debug!(
            "event=repo_flush module=repo entity={} in_transaction={}",
            T::NAME,
            !self.conn.is_autocommit()
        );
        Ok(())
    }

    fn delete(&self, entity: &T) -> RepoResult<()> {
        match entity.id() {
            Some(id) => self.delete_by_id(id),
            None => Ok(()),
        }
    }

    fn delete_by_id(&self, id: T::Id) -> RepoResult<()> {
        let scope = CallScope::begin(self.conn)?;
        let changed = T::delete_row(&scope, id)?;
        scope.commit()?;

        debug!(
            "event=repo_delete module=repo entity={} id={} changed={}",
            T::NAME,
            id.raw(),
            changed
        );
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<usize> {
        let scope = CallScope::begin(self.conn)?;
        let ids = self.all_ids(&scope)?;
        for id in &ids {
            T::delete_row(&scope, *id)?;
            debug!(
                "event=repo_delete module=repo entity={} id={}",
                T::NAME,
                id.raw()
            );
        }
        scope.commit()?;

        info!(
            "event=repo_delete_all module=repo entity={} status=ok count={}",
            T::NAME,
            ids.len()
        );
        Ok(ids.len())
    }

    fn delete_all_in_batch(&self) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {};", T::NAME), [])?;
        info!(
            "event=repo_delete_batch module=repo entity={} status=ok count={}",
            T::NAME,
            changed
        );
        Ok(changed)
    }

    fn delete_in_batch(&self, entities: &[T]) -> RepoResult<usize> {
        let ids = entities
            .iter()
            .filter_map(|entity| entity.id())
            .collect::<Vec<_>>();
        let changed = self.delete_ids(&ids)?;
        info!(
            "event=repo_delete_batch module=repo entity={} status=ok count={}",
            T::NAME,
            changed
        );
        Ok(changed)
    }
}

fn ensure_table_ready<T: Table>(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, T::NAME)? {
        return Err(RepoError::MissingRequiredTable(T::NAME));
    }

    let present = table_columns(conn, T::NAME)?;
    for column in T::COLUMNS.iter().copied() {
        if !present.iter().any(|current| current.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: T::NAME,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let mut rows = stmt.query([table])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(0)?);
    }
    Ok(columns)
}
