use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::tag::{NewTag, Tag, UpdateTag};

pub mod errors;

pub mod category;
pub mod product;
pub mod tag;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

/// Diesel-backed repository implementation that wraps an r2d2 pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
///
/// Both readers return products with their category and tag associations
/// eager-loaded.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records and their tag associations.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    /// Replace the product's tag set so it equals exactly `tag_ids`.
    ///
    /// Runs as a single transaction; on failure the prior tag set is intact.
    fn replace_product_tags(&self, product_id: i32, tag_ids: &[i32]) -> RepositoryResult<()>;
}

/// Read-only operations over category records.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Write operations over category records.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        category_id: i32,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over tag records.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tag records.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    fn update_tag(&self, tag_id: i32, updates: &UpdateTag) -> RepositoryResult<Tag>;
    fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()>;
}
