//! Cart repository for cart and line-item operations.
//!
//! A cart line is one row per `(cart_id, product_id)` pair; adding a product
//! that is already in the cart increments its quantity in a single upsert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mercadito_core::{CartId, ProductId};

use super::RepositoryError;
use crate::models::{Cart, CartItem, Product};

/// Raw `carts` row as stored.
#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    created_at: DateTime<Utc>,
}

/// One joined cart line with its product columns.
#[derive(sqlx::FromRow)]
struct CartLineRow {
    quantity: i32,
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

impl From<CartLineRow> for CartItem {
    fn from(row: CartLineRow) -> Self {
        Self {
            quantity: row.quantity,
            product: Product {
                id: ProductId::new(row.id),
                title: row.title,
                description: row.description,
                code: row.code,
                price: row.price,
                status: row.status,
                stock: row.stock,
                category: row.category,
                thumbnails: row.thumbnails,
            },
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self) -> Result<Cart, RepositoryError> {
        let row: CartRow =
            sqlx::query_as("INSERT INTO carts DEFAULT VALUES RETURNING id, created_at")
                .fetch_one(self.pool)
                .await?;

        Ok(Cart {
            id: CartId::new(row.id),
            created_at: row.created_at,
            products: Vec::new(),
        })
    }

    /// Get a cart with its populated line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let cart: Option<CartRow> =
            sqlx::query_as("SELECT id, created_at FROM carts WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        let Some(cart) = cart else {
            return Ok(None);
        };

        let lines: Vec<CartLineRow> = sqlx::query_as(
            "SELECT ci.quantity, \
                    p.id, p.title, p.description, p.code, p.price, \
                    p.status, p.stock, p.category, p.thumbnails \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
             ORDER BY p.id ASC",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Cart {
            id: CartId::new(cart.id),
            created_at: cart.created_at,
            products: lines.into_iter().map(CartItem::from).collect(),
        }))
    }

    /// Add units of a product to a cart (upsert: existing lines increment).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart or product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_product(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (cart_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(cart.as_i32())
        .bind(product.as_i32())
        .bind(quantity)
        .execute(self.pool)
        .await
        .map_err(foreign_key_to_not_found)?;

        Ok(())
    }

    /// Set the quantity of an existing cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2")
                .bind(cart.as_i32())
                .bind(product.as_i32())
                .bind(quantity)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Replace a cart's items wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart or a product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn replace_items(
        &self,
        cart: CartId,
        items: &[(ProductId, i32)],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.as_i32())
            .execute(&mut *tx)
            .await?;

        for (product, quantity) in items {
            sqlx::query(
                "INSERT INTO cart_items (cart_id, product_id, quantity) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (cart_id, product_id) \
                 DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
            )
            .bind(cart.as_i32())
            .bind(product.as_i32())
            .bind(*quantity)
            .execute(&mut *tx)
            .await
            .map_err(foreign_key_to_not_found)?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Remove a product line from a cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if a line was removed, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_product(
        &self,
        cart: CartId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
                .bind(cart.as_i32())
                .bind(product.as_i32())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn clear(&self, cart: CartId) -> Result<(), RepositoryError> {
        if !self.exists(cart).await? {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Whether a cart row exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, cart: CartId) -> Result<bool, RepositoryError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM carts WHERE id = $1")
            .bind(cart.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(found.is_some())
    }
}

/// Map foreign-key violations (unknown cart or product) to `NotFound`.
fn foreign_key_to_not_found(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::NotFound;
    }
    RepositoryError::Database(e)
}
