//! Product repository for catalog CRUD and paginated listing.

use rust_decimal::Decimal;
use sqlx::PgPool;

use mercadito_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Raw `products` row as stored.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    description: String,
    code: String,
    price: Decimal,
    status: bool,
    stock: i32,
    category: String,
    thumbnails: Vec<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            description: row.description,
            code: row.code,
            price: row.price,
            status: row.status,
            stock: row.stock,
            category: row.category,
            thumbnails: row.thumbnails,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, title, description, code, price, status, stock, category, thumbnails";

/// Optional filters shared by the listing query and its count.
const LIST_FILTER: &str =
    "($1::text IS NULL OR category = $1) AND ($2::boolean IS NULL OR status = $2)";

/// Sort direction for the listing query (by price).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Asc,
    Desc,
}

/// Fields required to insert a new product.
pub struct NewProduct<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub code: &'a str,
    pub price: Decimal,
    pub status: bool,
    pub stock: i32,
    pub category: &'a str,
    pub thumbnails: &'a [String],
}

/// Partial update; `None` fields keep their stored value.
#[derive(Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<bool>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products with optional category/status filters, price sorting,
    /// and limit/offset pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<&str>,
        status: Option<bool>,
        sort: Option<PriceSort>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let order = match sort {
            Some(PriceSort::Asc) => "price ASC, id ASC",
            Some(PriceSort::Desc) => "price DESC, id ASC",
            None => "id ASC",
        };
        // Only static fragments are interpolated; all values are bound.
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {LIST_FILTER} \
             ORDER BY {order} LIMIT $3 OFFSET $4"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(category)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// The full catalog, ordered by ID.
    ///
    /// Used for WebSocket snapshots and catalog-change broadcasts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Count products matching the listing filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        category: Option<&str>,
        status: Option<bool>,
    ) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM products WHERE {LIST_FILTER}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(category)
            .bind(status)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Product::from))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_product: NewProduct<'_>) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (title, description, code, price, status, stock, category, thumbnails) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(new_product.title)
        .bind(new_product.description)
        .bind(new_product.code)
        .bind(new_product.price)
        .bind(new_product.status)
        .bind(new_product.stock)
        .bind(new_product.category)
        .bind(new_product.thumbnails)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Apply a partial update to a product.
    ///
    /// The ID is immutable; `None` fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new code collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 code = COALESCE($4, code), \
                 price = COALESCE($5, price), \
                 status = COALESCE($6, status), \
                 stock = COALESCE($7, stock), \
                 category = COALESCE($8, category), \
                 thumbnails = COALESCE($9, thumbnails) \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.code)
        .bind(changes.price)
        .bind(changes.status)
        .bind(changes.stock)
        .bind(changes.category)
        .bind(changes.thumbnails)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
