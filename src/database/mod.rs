use crate::{config::AppConfig, models::UserRecord, utils::AppError};
use async_trait::async_trait;
use mongodb::bson::{doc, Bson};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;

#[cfg(test)]
pub mod memory;

/// Persistence seam for registrations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts `record` as a new document and returns its id
    async fn insert_user(&self, collection: &str, record: &UserRecord) -> Result<String, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

async fn client_options(config: &AppConfig) -> Result<ClientOptions, AppError> {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri)
        .await
        .map_err(|e| AppError::Configuration(format!("invalid MONGODB_URI: {}", e)))?;

    client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    client_options.max_pool_size = Some(config.max_pool_size);
    client_options.min_pool_size = Some(config.min_pool_size);
    client_options.max_idle_time = Some(Duration::from_secs(300));

    client_options.connect_timeout = Some(Duration::from_secs(config.timeout_secs));
    client_options.server_selection_timeout = Some(Duration::from_secs(config.timeout_secs));

    Ok(client_options)
}

fn inserted_id(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

async fn insert_into(db: &Database, collection: &str, record: &UserRecord) -> Result<String, AppError> {
    let result = db
        .collection::<UserRecord>(collection)
        .insert_one(record)
        .await?;
    Ok(inserted_id(result.inserted_id))
}

/// Process-wide client; every call borrows a connection from the driver pool
#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        log::info!("🔌 Connecting to MongoDB at {}", config.mongodb_uri);

        let client = Client::with_options(client_options(config).await?)?;
        let db = client.database(&config.database_name);

        let mongodb = Self { client, db };

        // Fail fast at startup instead of on the first registration
        mongodb.ping().await?;

        log::info!(
            "✅ Connected to MongoDB database: {} (pool {}-{})",
            config.database_name,
            config.min_pool_size,
            config.max_pool_size
        );

        Ok(mongodb)
    }

    /// Closes the pool; call once after the HTTP server has stopped
    pub async fn shutdown(self) {
        log::info!("🔌 Closing MongoDB connection pool");
        self.client.shutdown().await;
    }
}

#[async_trait]
impl UserStore for MongoDB {
    async fn insert_user(&self, collection: &str, record: &UserRecord) -> Result<String, AppError> {
        insert_into(&self.db, collection, record).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Opens a client for a single call and shuts it down before returning
#[derive(Clone)]
pub struct ScopedMongoStore {
    options: ClientOptions,
    database_name: String,
}

impl ScopedMongoStore {
    pub async fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut options = client_options(config).await?;
        // A scoped client never serves more than one operation
        options.min_pool_size = Some(0);
        options.max_pool_size = Some(1);

        log::info!(
            "🔌 MongoDB per-request connections to {} (database: {})",
            config.mongodb_uri,
            config.database_name
        );

        Ok(Self {
            options,
            database_name: config.database_name.clone(),
        })
    }

    fn connect(&self) -> Result<Client, AppError> {
        Ok(Client::with_options(self.options.clone())?)
    }
}

#[async_trait]
impl UserStore for ScopedMongoStore {
    async fn insert_user(&self, collection: &str, record: &UserRecord) -> Result<String, AppError> {
        let client = self.connect()?;
        let result = insert_into(&client.database(&self.database_name), collection, record).await;

        // Released on success and on failure alike
        client.shutdown().await;

        result
    }

    async fn ping(&self) -> Result<(), AppError> {
        let client = self.connect()?;
        let result = client
            .database(&self.database_name)
            .run_command(doc! { "ping": 1 })
            .await;
        client.shutdown().await;

        result.map(|_| ()).map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionMode;
    use crate::models::classify;

    #[test]
    fn test_object_id_is_rendered_as_hex() {
        let oid = mongodb::bson::oid::ObjectId::new();
        assert_eq!(inserted_id(Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(inserted_id(Bson::Int32(7)), "7");
    }

    #[tokio::test]
    async fn test_scoped_store_rejects_malformed_uri() {
        let config = AppConfig {
            mongodb_uri: "not-a-mongo-uri".to_string(),
            connection_mode: ConnectionMode::PerRequest,
            ..AppConfig::default()
        };

        let err = ScopedMongoStore::new(&config).await.err().unwrap();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_scoped_store_reports_unreachable_server() {
        let config = AppConfig {
            // Nothing listens on port 1; selection times out quickly
            mongodb_uri: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200"
                .to_string(),
            timeout_secs: 1,
            ..AppConfig::default()
        };

        let store = ScopedMongoStore::new(&config).await.unwrap();
        let record = UserRecord::new(
            "bob".to_string(),
            "bob@gmail.com".to_string(),
            "pw".to_string(),
            classify("bob@gmail.com"),
        );

        let err = store.insert_user("users", &record).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_pooled_insert_against_live_mongodb() {
        dotenv::dotenv().ok();

        let config = AppConfig::from_env().unwrap();
        let db = MongoDB::connect(&config).await.unwrap();

        let email = "live-test@hospital.gmail.com";
        let classification = classify(email);
        let record = UserRecord::new(
            "live-test".to_string(),
            email.to_string(),
            "pw".to_string(),
            classification,
        );

        let id = db.insert_user(classification.collection(), &record).await.unwrap();
        assert!(!id.is_empty());

        db.db
            .collection::<UserRecord>(classification.collection())
            .delete_many(doc! { "email": email })
            .await
            .unwrap();
        db.shutdown().await;
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_scoped_insert_against_live_mongodb() {
        dotenv::dotenv().ok();

        let config = AppConfig {
            connection_mode: ConnectionMode::PerRequest,
            ..AppConfig::from_env().unwrap()
        };
        let store = ScopedMongoStore::new(&config).await.unwrap();

        let email = "scoped-live-test@gmail.com";
        let classification = classify(email);
        let record = UserRecord::new(
            "scoped-live-test".to_string(),
            email.to_string(),
            "pw".to_string(),
            classification,
        );

        // Each call opens and shuts down its own client, so back-to-back inserts both land
        let first = store.insert_user(classification.collection(), &record).await.unwrap();
        let second = store.insert_user(classification.collection(), &record).await.unwrap();
        assert_ne!(first, second);
        store.ping().await.unwrap();

        let client = Client::with_options(store.options.clone()).unwrap();
        let deleted = client
            .database(&store.database_name)
            .collection::<UserRecord>(classification.collection())
            .delete_many(doc! { "email": email })
            .await
            .unwrap();
        assert_eq!(deleted.deleted_count, 2);
        client.shutdown().await;
    }
}
