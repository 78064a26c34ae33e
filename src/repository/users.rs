use mongodb::{bson::doc, options::IndexOptions, Collection, Database, IndexModel};
use tracing::info;

use crate::{
    error::{AppError, Result},
    models::User,
};

/// Account storage backing JWT authentication
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub async fn new(database: &Database) -> Result<Self> {
        let collection = database.collection::<User>("users");

        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection
            .create_index(index, None)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create user index: {}", e)))?;

        Ok(Self { collection })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .collection
            .find_one(doc! {"username": username}, None)
            .await?;
        Ok(user)
    }

    pub async fn create(&self, user: &User) -> Result<()> {
        self.collection
            .insert_one(user, None)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {}", e)))?;

        info!("created user {}", user.username);
        Ok(())
    }
}
