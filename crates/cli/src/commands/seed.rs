//! Catalog seeding command.
//!
//! Inserts a small set of demo products. Idempotent: rows whose code is
//! already present are skipped.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct DemoProduct {
    title: &'static str,
    description: &'static str,
    code: &'static str,
    price_cents: i64,
    stock: i32,
    category: &'static str,
}

const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        title: "Yerba mate 1kg",
        description: "Yerba mate con palo, estacionada 24 meses.",
        code: "YM-001",
        price_cents: 1250,
        stock: 120,
        category: "almacen",
    },
    DemoProduct {
        title: "Dulce de leche 400g",
        description: "Dulce de leche clásico de tambo.",
        code: "DL-010",
        price_cents: 980,
        stock: 60,
        category: "almacen",
    },
    DemoProduct {
        title: "Mate torpedo",
        description: "Mate de calabaza curado, virola de alpaca.",
        code: "MT-021",
        price_cents: 15400,
        stock: 25,
        category: "regaleria",
    },
    DemoProduct {
        title: "Bombilla pico de loro",
        description: "Bombilla de acero inoxidable.",
        code: "BB-007",
        price_cents: 4300,
        stock: 80,
        category: "regaleria",
    },
    DemoProduct {
        title: "Alfajores x6",
        description: "Caja de seis alfajores de maicena.",
        code: "AL-033",
        price_cents: 2100,
        stock: 45,
        category: "dulces",
    },
];

/// Seed the catalog with demo products.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("MERCADITO_DATABASE_URL"))?;

    tracing::info!("Connecting to store database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let mut inserted = 0_u64;
    for product in DEMO_PRODUCTS {
        let result = sqlx::query(
            "INSERT INTO products (title, description, code, price, stock, category) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(product.title)
        .bind(product.description)
        .bind(product.code)
        .bind(Decimal::new(product.price_cents, 2))
        .bind(product.stock)
        .bind(product.category)
        .execute(&pool)
        .await?;

        inserted += result.rows_affected();
    }

    tracing::info!(
        inserted,
        total = DEMO_PRODUCTS.len(),
        "Catalog seed complete"
    );
    Ok(())
}
