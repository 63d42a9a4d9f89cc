//! Repository contracts shared by all entities.
//!
//! # Responsibility
//! - `ReadOnlyRepository`: lookups, listing, sorting, paging and counts
//!   without any mutation method, for callers that must only query.
//! - `CrudRepository`: adds insert-or-update and the delete variants.
//!
//! # Invariants
//! - Looking up a missing id yields `None`/`false`, never an error.
//! - `save` returns the entity with its store-assigned id populated.
//! - Batch deletes bypass the per-entity delete path and its cascades.

use super::error::RepoResult;
use super::paging::{Page, PageRequest, Sort};

/// Query-only view of an entity store.
pub trait ReadOnlyRepository {
    type Entity;
    type Id: Copy;

    fn find_by_id(&self, id: Self::Id) -> RepoResult<Option<Self::Entity>>;
    /// All rows in id order.
    fn find_all(&self) -> RepoResult<Vec<Self::Entity>>;
    /// Rows whose id is in `ids`, in id order. Unknown ids are skipped.
    fn find_all_by_id(&self, ids: &[Self::Id]) -> RepoResult<Vec<Self::Entity>>;
    fn find_all_sorted(&self, sort: &Sort) -> RepoResult<Vec<Self::Entity>>;
    fn find_page(&self, request: &PageRequest) -> RepoResult<Page<Self::Entity>>;
    fn count(&self) -> RepoResult<u64>;
    fn exists_by_id(&self, id: Self::Id) -> RepoResult<bool>;
}

/// Full create/update/delete access to an entity store.
pub trait CrudRepository: ReadOnlyRepository {
    /// Inserts an unsaved entity or upserts a saved one by id.
    fn save(&self, entity: &Self::Entity) -> RepoResult<Self::Entity>;
    /// Saves every entity in one transaction.
    fn save_all(&self, entities: &[Self::Entity]) -> RepoResult<Vec<Self::Entity>>;
    /// Makes sure every write issued so far has reached the store.
    fn flush(&self) -> RepoResult<()>;
    fn save_and_flush(&self, entity: &Self::Entity) -> RepoResult<Self::Entity> {
        let saved = self.save(entity)?;
        self.flush()?;
        Ok(saved)
    }
    /// Deletes one entity through the per-entity path. Unsaved entities and
    /// missing rows are ignored.
    fn delete(&self, entity: &Self::Entity) -> RepoResult<()>;
    fn delete_by_id(&self, id: Self::Id) -> RepoResult<()>;
    /// Deletes every row through the per-entity path. Returns the count.
    fn delete_all(&self) -> RepoResult<usize>;
    /// Deletes every row with one bulk statement. Returns the count.
    fn delete_all_in_batch(&self) -> RepoResult<usize>;
    /// Deletes exactly the given entities with one bulk statement.
    fn delete_in_batch(&self, entities: &[Self::Entity]) -> RepoResult<usize>;
}
