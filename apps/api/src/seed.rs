//! Startup seeding: bootstrap admin account and sample catalog.
//!
//! Idempotent by lookup-before-insert, so restarting the server never
//! duplicates rows and never overwrites data that operators changed.

use chrono::Utc;
use tracing::info;

use sweetshop_core::{Account, NewSweet, Role, SweetFilter};
use sweetshop_db::Database;

use crate::auth::hash_password;
use crate::config::ApiConfig;
use crate::error::ApiError;

const SAMPLE_SWEETS: &[(&str, &str, f64, i64)] = &[
    ("Kaju Katli", "Traditional", 8.5, 20),
    ("Gulab Jamun", "Traditional", 5.0, 30),
    ("Chocolate Fudge", "Modern", 6.5, 15),
];

/// Seeds the bootstrap admin and the sample catalog if they are absent.
pub async fn seed_initial_data(db: &Database, config: &ApiConfig) -> Result<(), ApiError> {
    seed_admin(db, config).await?;
    seed_sweets(db).await?;
    Ok(())
}

async fn seed_admin(db: &Database, config: &ApiConfig) -> Result<(), ApiError> {
    let accounts = db.accounts();

    if accounts
        .get_by_email(&config.default_admin_email)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let admin = Account {
        email: config.default_admin_email.clone(),
        password_hash: hash_password(&config.default_admin_password)?,
        role: Role::Admin,
        created_at: Utc::now(),
    };
    accounts.insert(&admin).await?;

    info!(email = %admin.email, "Seeded bootstrap admin account");
    Ok(())
}

async fn seed_sweets(db: &Database) -> Result<(), ApiError> {
    let sweets = db.sweets();

    for &(name, category, price, quantity) in SAMPLE_SWEETS {
        let existing = sweets
            .search(&SweetFilter {
                name: Some(name.to_string()),
                ..Default::default()
            })
            .await?;

        // The filter is a substring match; only an exact name counts
        if existing.iter().any(|s| s.name == name) {
            continue;
        }

        let sweet = sweets
            .insert(&NewSweet {
                name: name.to_string(),
                category: category.to_string(),
                price,
                quantity,
            })
            .await?;

        info!(id = sweet.id, name = %sweet.name, "Seeded sample sweet");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweetshop_db::DbConfig;

    fn test_config() -> ApiConfig {
        ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_lifetime_secs: 3600,
            default_admin_email: "admin@example.com".to_string(),
            default_admin_password: "admin123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = test_config();

        seed_initial_data(&db, &config).await.unwrap();
        seed_initial_data(&db, &config).await.unwrap();

        assert_eq!(db.accounts().count().await.unwrap(), 1);
        assert_eq!(db.sweets().list().await.unwrap().len(), 3);

        let admin = db
            .accounts()
            .get_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_seed_preserves_operator_changes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = test_config();

        seed_initial_data(&db, &config).await.unwrap();

        // Operator drains the Kaju Katli stock
        let all = db.sweets().list().await.unwrap();
        let kaju = all.iter().find(|s| s.name == "Kaju Katli").unwrap();
        db.sweets().purchase(kaju.id, 20).await.unwrap();

        // Re-seed must not top it back up
        seed_initial_data(&db, &config).await.unwrap();
        let kaju = db.sweets().get_by_id(kaju.id).await.unwrap().unwrap();
        assert_eq!(kaju.quantity, 0);
    }
}
