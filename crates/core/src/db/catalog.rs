//! Catalog repository backed by `portfolio_items`, `categories` and
//! `artist_profile`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::defaults::CatalogSeed;
use crate::ports::{CatalogRepository, StoreError};
use crate::types::{ArtistProfile, DisplayPrice, ItemId, NewPortfolioItem, PortfolioItem};

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    title: String,
    category: String,
    image_url: String,
    description: String,
    price: String,
}

impl From<ItemRow> for PortfolioItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ItemId::new(row.id),
            title: row.title,
            category: row.category,
            image_url: row.image_url,
            description: row.description,
            price: DisplayPrice::new(row.price),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    headline: String,
    highlight: String,
    description: String,
    image_url: String,
}

const INSERT_ITEM_WITH_ID: &str = r"
    INSERT INTO portfolio_items (id, title, category, image_url, description, price)
    VALUES ($1, $2, $3, $4, $5, $6)
";

const UPSERT_PROFILE: &str = r"
    INSERT INTO artist_profile (singleton, headline, highlight, description, image_url, updated_at)
    VALUES (TRUE, $1, $2, $3, $4, now())
    ON CONFLICT (singleton) DO UPDATE
    SET headline = EXCLUDED.headline,
        highlight = EXCLUDED.highlight,
        description = EXCLUDED.description,
        image_url = EXCLUDED.image_url,
        updated_at = now()
";

/// [`CatalogRepository`] over `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_items(&self) -> Result<Vec<PortfolioItem>, StoreError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, title, category, image_url, description, price
            FROM portfolio_items
            ORDER BY position DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PortfolioItem::from).collect())
    }

    async fn insert_item(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StoreError> {
        let id = sqlx::query_scalar::<_, String>(
            r"
            INSERT INTO portfolio_items (title, category, image_url, description, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&item.title)
        .bind(&item.category)
        .bind(&item.image_url)
        .bind(&item.description)
        .bind(item.price.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(item.with_id(ItemId::new(id)))
    }

    async fn update_item(&self, item: &PortfolioItem) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE portfolio_items
            SET title = $2, category = $3, image_url = $4, description = $5, price = $6,
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(item.id.as_str())
        .bind(&item.title)
        .bind(&item.category)
        .bind(&item.image_url)
        .bind(&item.description)
        .bind(item.price.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_item(&self, id: &ItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM portfolio_items WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let names =
            sqlx::query_scalar::<_, String>("SELECT name FROM categories ORDER BY position")
                .fetch_all(&self.pool)
                .await?;
        Ok(names)
    }

    async fn insert_category(&self, name: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_category(&self, name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn load_profile(&self) -> Result<Option<ArtistProfile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT headline, highlight, description, image_url FROM artist_profile",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| ArtistProfile {
            headline: r.headline,
            highlight: r.highlight,
            description: r.description,
            image_url: r.image_url,
        }))
    }

    async fn save_profile(&self, profile: &ArtistProfile) -> Result<(), StoreError> {
        sqlx::query(UPSERT_PROFILE)
            .bind(&profile.headline)
            .bind(&profile.highlight)
            .bind(&profile.description)
            .bind(&profile.image_url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn reset(&self, seed: &CatalogSeed) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM portfolio_items")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM categories")
            .execute(&mut *tx)
            .await?;

        for name in &seed.categories {
            sqlx::query("INSERT INTO categories (name) VALUES ($1)")
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        // Listing is newest-first, so insert in reverse display order.
        for item in seed.items.iter().rev() {
            sqlx::query(INSERT_ITEM_WITH_ID)
                .bind(item.id.as_str())
                .bind(&item.title)
                .bind(&item.category)
                .bind(&item.image_url)
                .bind(&item.description)
                .bind(item.price.as_str())
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(UPSERT_PROFILE)
            .bind(&seed.profile.headline)
            .bind(&seed.profile.highlight)
            .bind(&seed.profile.description)
            .bind(&seed.profile.image_url)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
