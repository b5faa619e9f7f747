//! Demo catalog seed command.
//!
//! Inserts a small set of categories and products for local development.
//! Idempotent: rows are matched by slug, so re-running updates nothing and
//! duplicates nothing.

use sqlx::PgPool;

use super::{CommandError, connect};

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
}

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    price: i64,
    compare_at_price: Option<i64>,
    category_slug: &'static str,
    image: &'static str,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Cojines",
        slug: "cojines",
        description: "Cojines tejidos a mano en telar.",
    },
    SeedCategory {
        name: "Mantas",
        slug: "mantas",
        description: "Mantas de lana y algodón.",
    },
    SeedCategory {
        name: "Individuales",
        slug: "individuales",
        description: "Individuales y caminos de mesa.",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Cojín Flores del Campo",
        slug: "cojin-flores-del-campo",
        description: "Cojín de 45x45 cm tejido en telar con motivos florales.",
        price: 45_000,
        compare_at_price: Some(55_000),
        category_slug: "cojines",
        image: "/static/img/seed/cojin-flores.jpg",
    },
    SeedProduct {
        name: "Cojín Rayas Andinas",
        slug: "cojin-rayas-andinas",
        description: "Cojín de 45x45 cm con rayas en tonos tierra.",
        price: 42_000,
        compare_at_price: None,
        category_slug: "cojines",
        image: "/static/img/seed/cojin-rayas.jpg",
    },
    SeedProduct {
        name: "Manta Telar Grande",
        slug: "manta-telar-grande",
        description: "Manta de 120x180 cm en lana virgen.",
        price: 180_000,
        compare_at_price: None,
        category_slug: "mantas",
        image: "/static/img/seed/manta-grande.jpg",
    },
    SeedProduct {
        name: "Camino de Mesa Espiga",
        slug: "camino-de-mesa-espiga",
        description: "Camino de mesa de 40x140 cm en punto espiga.",
        price: 38_000,
        compare_at_price: None,
        category_slug: "individuales",
        image: "/static/img/seed/camino-espiga.jpg",
    },
];

/// Seed the catalog with demo data.
///
/// # Errors
///
/// Returns `CommandError::Database` if any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    for category in CATEGORIES {
        insert_category(&pool, category).await?;
    }
    for product in PRODUCTS {
        insert_product(&pool, product).await?;
    }

    tracing::info!(
        categories = CATEGORIES.len(),
        products = PRODUCTS.len(),
        "Seed complete"
    );
    Ok(())
}

async fn insert_category(pool: &PgPool, category: &SeedCategory) -> Result<(), CommandError> {
    sqlx::query(
        r"
        INSERT INTO catalog.category (name, slug, description, position)
        VALUES ($1, $2, $3,
                COALESCE((SELECT MAX(position) + 1 FROM catalog.category), 0))
        ON CONFLICT (slug) DO NOTHING
        ",
    )
    .bind(category.name)
    .bind(category.slug)
    .bind(category.description)
    .execute(pool)
    .await?;

    Ok(())
}

async fn insert_product(pool: &PgPool, product: &SeedProduct) -> Result<(), CommandError> {
    let result = sqlx::query(
        r"
        INSERT INTO catalog.product
            (name, slug, description, price, compare_at_price, category_id)
        SELECT $1, $2, $3, $4, $5, c.id
        FROM catalog.category c
        WHERE c.slug = $6
        ON CONFLICT (slug) DO NOTHING
        ",
    )
    .bind(product.name)
    .bind(product.slug)
    .bind(product.description)
    .bind(product.price)
    .bind(product.compare_at_price)
    .bind(product.category_slug)
    .execute(pool)
    .await?;

    // Only attach the image on first insert; re-runs leave the gallery alone.
    if result.rows_affected() > 0 {
        sqlx::query(
            r"
            INSERT INTO catalog.product_image (product_id, file_path, position)
            SELECT p.id, $2, 0
            FROM catalog.product p
            WHERE p.slug = $1
            ",
        )
        .bind(product.slug)
        .bind(product.image)
        .execute(pool)
        .await?;
    }

    Ok(())
}
