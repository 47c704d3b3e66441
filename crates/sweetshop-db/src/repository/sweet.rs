//! # Sweet Repository
//!
//! Database operations for the sweet catalog, including the stock engine.
//!
//! ## Stock Engine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How the Guarded Decrement Works                         │
//! │                                                                         │
//! │  purchase(id: 7, amount: 2)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  UPDATE sweets SET quantity = quantity - 2                              │
//! │  WHERE id = 7 AND quantity >= 2   ← check and write in ONE statement    │
//! │       │                                                                 │
//! │       ├── 1 row affected  → re-read row → StockUpdate::Applied          │
//! │       │                                                                 │
//! │       └── 0 rows affected → re-read row (same tx)                       │
//! │               ├── row exists → Insufficient { available, requested }    │
//! │               └── no row     → NotFound                                 │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  SQLite's single-writer lock serializes contending purchases, so two    │
//! │  buyers racing for the last unit see exactly one success. The schema    │
//! │  CHECK (quantity >= 0) is a backstop the guard makes unreachable.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use sweetshop_core::{NewSweet, Sweet, SweetFilter, SweetUpdate};

// =============================================================================
// Row Type
// =============================================================================

/// Raw sweet row as stored in SQLite.
#[derive(Debug, sqlx::FromRow)]
struct SweetRow {
    id: i64,
    name: String,
    category: String,
    price: f64,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SweetRow> for Sweet {
    fn from(row: SweetRow) -> Self {
        Sweet {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SWEET_COLUMNS: &str = "id, name, category, price, quantity, created_at, updated_at";

// =============================================================================
// Stock Update Outcome
// =============================================================================

/// Outcome of a stock mutation (purchase or restock).
///
/// Insufficiency is an expected business outcome, not a database failure,
/// so it travels as a variant instead of a `DbError`.
#[derive(Debug)]
pub enum StockUpdate {
    /// The mutation was applied; carries the post-mutation row.
    Applied(Sweet),

    /// A purchase asked for more units than are in stock. Nothing changed.
    Insufficient { available: i64, requested: i64 },

    /// No sweet with the given id exists.
    NotFound,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sweet database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = SweetRepository::new(pool);
///
/// let sweet = repo.insert(&new_sweet).await?;
/// let outcome = repo.purchase(sweet.id, 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SweetRepository {
    pool: SqlitePool,
}

impl SweetRepository {
    /// Creates a new SweetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SweetRepository { pool }
    }

    // =========================================================================
    // Catalog CRUD
    // =========================================================================

    /// Inserts a new sweet and returns the stored row with its assigned id.
    pub async fn insert(&self, new: &NewSweet) -> DbResult<Sweet> {
        debug!(name = %new.name, category = %new.category, "Inserting sweet");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO sweets (name, category, price, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.price)
        .bind(new.quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        let row = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Gets a sweet by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Sweet))` - Sweet found
    /// * `Ok(None)` - No sweet with this id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sweet>> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Sweet::from))
    }

    /// Lists the entire catalog ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Sweet>> {
        let rows = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Sweet::from).collect())
    }

    /// Searches the catalog with ANDed filter criteria.
    ///
    /// ## How It Works
    /// - Name and category match case-insensitively on substrings
    ///   (`LOWER(col) LIKE '%term%'`)
    /// - Price bounds are inclusive on both ends
    /// - An empty filter behaves like [`list`](Self::list)
    pub async fn search(&self, filter: &SweetFilter) -> DbResult<Vec<Sweet>> {
        debug!(?filter, "Searching sweets");

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SWEET_COLUMNS} FROM sweets WHERE 1=1"));

        if let Some(name) = &filter.name {
            builder.push(" AND LOWER(name) LIKE ");
            builder.push_bind(format!("%{}%", name.to_lowercase()));
        }

        if let Some(category) = &filter.category {
            builder.push(" AND LOWER(category) LIKE ");
            builder.push_bind(format!("%{}%", category.to_lowercase()));
        }

        if let Some(min) = filter.min_price {
            builder.push(" AND price >= ");
            builder.push_bind(min);
        }

        if let Some(max) = filter.max_price {
            builder.push(" AND price <= ");
            builder.push_bind(max);
        }

        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<SweetRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned sweets");
        Ok(rows.into_iter().map(Sweet::from).collect())
    }

    /// Applies a partial update: only provided fields change. An update
    /// with no fields is a plain read and does not touch `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Some(Sweet))` - The updated row
    /// * `Ok(None)` - No sweet with this id
    pub async fn update(&self, id: i64, update: &SweetUpdate) -> DbResult<Option<Sweet>> {
        debug!(id, "Updating sweet");

        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let result = sqlx::query(
            r#"
            UPDATE sweets SET
                name = COALESCE(?1, name),
                category = COALESCE(?2, category),
                price = COALESCE(?3, price),
                quantity = COALESCE(?4, quantity),
                updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(&update.name)
        .bind(&update.category)
        .bind(update.price)
        .bind(update.quantity)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Deletes a sweet.
    ///
    /// ## Returns
    /// * `Ok(true)` - Row existed and was deleted
    /// * `Ok(false)` - No sweet with this id
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting sweet");

        let result = sqlx::query("DELETE FROM sweets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Stock Engine
    // =========================================================================

    /// Purchases `amount` units: decrements stock if enough is available.
    ///
    /// The availability check and the decrement happen in one guarded
    /// statement, so a concurrent purchase can never drive the quantity
    /// negative. Callers must pass `amount > 0` (validated upstream).
    pub async fn purchase(&self, id: i64, amount: i64) -> DbResult<StockUpdate> {
        debug!(id, amount, "Purchasing sweet");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE sweets
            SET quantity = quantity - ?1, updated_at = ?2
            WHERE id = ?3 AND quantity >= ?1
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Re-read inside the same transaction to tell "missing" apart
            // from "not enough stock".
            let row = sqlx::query_as::<_, SweetRow>(&format!(
                "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
            ))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            tx.commit().await?;

            return Ok(match row {
                Some(row) => StockUpdate::Insufficient {
                    available: row.quantity,
                    requested: amount,
                },
                None => StockUpdate::NotFound,
            });
        }

        let row = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id, remaining = row.quantity, "Purchase applied");
        Ok(StockUpdate::Applied(row.into()))
    }

    /// Restocks `amount` units: increments stock unconditionally.
    ///
    /// Restock can never violate the non-negative invariant, so the only
    /// failure mode is a missing sweet.
    pub async fn restock(&self, id: i64, amount: i64) -> DbResult<StockUpdate> {
        debug!(id, amount, "Restocking sweet");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE sweets
            SET quantity = quantity + ?1, updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.commit().await?;
            return Ok(StockUpdate::NotFound);
        }

        let row = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id, quantity = row.quantity, "Restock applied");
        Ok(StockUpdate::Applied(row.into()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn new_sweet(name: &str, category: &str, price: f64, quantity: i64) -> NewSweet {
        NewSweet {
            name: name.to_string(),
            category: category.to_string(),
            price,
            quantity,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = test_db().await;
        let repo = db.sweets();

        let first = repo
            .insert(&new_sweet("Kaju Katli", "Traditional", 8.5, 20))
            .await
            .unwrap();
        let second = repo
            .insert(&new_sweet("Gulab Jamun", "Traditional", 5.0, 30))
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.name, "Kaju Katli");
        assert_eq!(first.quantity, 20);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let db = test_db().await;
        let repo = db.sweets();

        let first = repo
            .insert(&new_sweet("Barfi", "Traditional", 4.0, 10))
            .await
            .unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo
            .insert(&new_sweet("Jalebi", "Traditional", 3.0, 10))
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let db = test_db().await;
        let repo = db.sweets();

        assert!(repo.list().await.unwrap().is_empty());

        let sweet = repo
            .insert(&new_sweet("Chocolate Fudge", "Modern", 6.5, 15))
            .await
            .unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);

        let found = repo.get_by_id(sweet.id).await.unwrap().unwrap();
        assert_eq!(found, sweet);

        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_filters_are_anded() {
        let db = test_db().await;
        let repo = db.sweets();

        repo.insert(&new_sweet("Kaju Katli", "Traditional", 8.5, 20))
            .await
            .unwrap();
        repo.insert(&new_sweet("Gulab Jamun", "Traditional", 5.0, 30))
            .await
            .unwrap();
        repo.insert(&new_sweet("Chocolate Fudge", "Modern", 6.5, 15))
            .await
            .unwrap();

        // Case-insensitive substring on name
        let results = repo
            .search(&SweetFilter {
                name: Some("KAJU".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Kaju Katli");

        // Category + price range combined
        let results = repo
            .search(&SweetFilter {
                category: Some("traditional".to_string()),
                min_price: Some(5.0),
                max_price: Some(8.5),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        // Bounds are inclusive
        let results = repo
            .search(&SweetFilter {
                min_price: Some(6.5),
                max_price: Some(6.5),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Chocolate Fudge");

        // No matches is an empty list, not an error
        let results = repo
            .search(&SweetFilter {
                name: Some("ladoo".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(results.is_empty());

        // Empty filter returns everything
        let results = repo.search(&SweetFilter::default()).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = test_db().await;
        let repo = db.sweets();

        let sweet = repo
            .insert(&new_sweet("Rasgulla", "Traditional", 4.5, 25))
            .await
            .unwrap();

        let updated = repo
            .update(
                sweet.id,
                &SweetUpdate {
                    price: Some(5.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 5.5);
        // Untouched fields keep their values
        assert_eq!(updated.name, "Rasgulla");
        assert_eq!(updated.quantity, 25);

        assert!(repo
            .update(9999, &SweetUpdate::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_update_does_not_mutate() {
        let db = test_db().await;
        let repo = db.sweets();

        let sweet = repo
            .insert(&new_sweet("Soan Papdi", "Traditional", 3.0, 8))
            .await
            .unwrap();

        let unchanged = repo
            .update(sweet.id, &SweetUpdate::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(unchanged, sweet);
        // A no-op update is a read: the mutation timestamp stays put.
        assert_eq!(unchanged.updated_at, sweet.updated_at);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.sweets();

        let sweet = repo
            .insert(&new_sweet("Peda", "Traditional", 3.5, 12))
            .await
            .unwrap();

        assert!(repo.delete(sweet.id).await.unwrap());
        assert!(repo.get_by_id(sweet.id).await.unwrap().is_none());

        // Second delete finds nothing
        assert!(!repo.delete(sweet.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_purchase_and_restock_lifecycle() {
        let db = test_db().await;
        let repo = db.sweets();

        let ladoo = repo
            .insert(&new_sweet("Ladoo", "Traditional", 2.5, 10))
            .await
            .unwrap();

        // Buy 5 of 10
        let outcome = repo.purchase(ladoo.id, 5).await.unwrap();
        let sweet = match outcome {
            StockUpdate::Applied(s) => s,
            other => panic!("expected Applied, got {other:?}"),
        };
        assert_eq!(sweet.quantity, 5);

        // Buying 6 more fails and changes nothing
        let outcome = repo.purchase(ladoo.id, 6).await.unwrap();
        match outcome {
            StockUpdate::Insufficient {
                available,
                requested,
            } => {
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("expected Insufficient, got {other:?}"),
        }
        assert_eq!(repo.get_by_id(ladoo.id).await.unwrap().unwrap().quantity, 5);

        // Restock 6 → 11
        let outcome = repo.restock(ladoo.id, 6).await.unwrap();
        let sweet = match outcome {
            StockUpdate::Applied(s) => s,
            other => panic!("expected Applied, got {other:?}"),
        };
        assert_eq!(sweet.quantity, 11);
    }

    #[tokio::test]
    async fn test_purchase_drains_to_exactly_zero() {
        let db = test_db().await;
        let repo = db.sweets();

        let sweet = repo
            .insert(&new_sweet("Halwa", "Traditional", 4.0, 4))
            .await
            .unwrap();

        let outcome = repo.purchase(sweet.id, 4).await.unwrap();
        match outcome {
            StockUpdate::Applied(s) => assert_eq!(s.quantity, 0),
            other => panic!("expected Applied, got {other:?}"),
        }

        // Zero stock: any further purchase fails
        let outcome = repo.purchase(sweet.id, 1).await.unwrap();
        assert!(matches!(
            outcome,
            StockUpdate::Insufficient {
                available: 0,
                requested: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_stock_operations_on_missing_sweet() {
        let db = test_db().await;
        let repo = db.sweets();

        assert!(matches!(
            repo.purchase(9999, 1).await.unwrap(),
            StockUpdate::NotFound
        ));
        assert!(matches!(
            repo.restock(9999, 1).await.unwrap(),
            StockUpdate::NotFound
        ));
    }

    #[tokio::test]
    async fn test_concurrent_purchases_of_last_unit() {
        // File-backed database so the pool can hand out multiple
        // connections; in-memory SQLite is pinned to one.
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("race.db")).max_connections(4);
        let db = Database::new(config).await.unwrap();
        let repo = db.sweets();

        let sweet = repo
            .insert(&new_sweet("Last Ladoo", "Traditional", 2.5, 1))
            .await
            .unwrap();

        let (a, b) = tokio::join!(repo.purchase(sweet.id, 1), repo.purchase(sweet.id, 1));
        let outcomes = [a.unwrap(), b.unwrap()];

        let applied = outcomes
            .iter()
            .filter(|o| matches!(o, StockUpdate::Applied(_)))
            .count();
        let insufficient = outcomes
            .iter()
            .filter(|o| matches!(o, StockUpdate::Insufficient { .. }))
            .count();

        assert_eq!(applied, 1);
        assert_eq!(insufficient, 1);

        let final_quantity = repo.get_by_id(sweet.id).await.unwrap().unwrap().quantity;
        assert_eq!(final_quantity, 0);
    }

    #[tokio::test]
    async fn test_many_concurrent_purchases_never_oversell() {
        // With stock 10 and 8 buyers each taking 3, exactly three
        // purchases can succeed; the rest must see Insufficient and the
        // final quantity is 10 - 3*3 = 1.
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("herd.db")).max_connections(4);
        let db = Database::new(config).await.unwrap();
        let repo = db.sweets();

        let sweet = repo
            .insert(&new_sweet("Festival Box", "Seasonal", 12.0, 10))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            let id = sweet.id;
            handles.push(tokio::spawn(async move { repo.purchase(id, 3).await }));
        }

        let mut applied = 0;
        let mut insufficient = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                StockUpdate::Applied(s) => {
                    assert!(s.quantity >= 0);
                    applied += 1;
                }
                StockUpdate::Insufficient { available, .. } => {
                    assert!(available >= 0);
                    insufficient += 1;
                }
                StockUpdate::NotFound => panic!("sweet vanished mid-test"),
            }
        }

        assert_eq!(applied, 3);
        assert_eq!(insufficient, 5);

        let final_quantity = repo.get_by_id(sweet.id).await.unwrap().unwrap().quantity;
        assert_eq!(final_quantity, 1);
    }
}
