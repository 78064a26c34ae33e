use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    cache::{CacheInvalidator, CacheManager},
    error::{AppError, Result},
    models::{CreateMedicine, Medicine, UpdateMedicine},
};

/// Medicines returned per page when a page number is requested
pub const PAGE_SIZE: u32 = 20;

/// Persistence for medicine records, with cache invalidation wired into
/// every mutation path.
///
/// All writes flow through this type, which makes it the single choke point
/// where the write protocol holds: acquire mutation locks, persist,
/// invalidate the affected cache keys, release the locks. No code path
/// commits a change without a following invalidation, and the locks are
/// released on every exit path.
pub struct MedicineRepository {
    collection: Collection<Medicine>,
    cache: Arc<CacheManager>,
    invalidator: CacheInvalidator,
}

impl MedicineRepository {
    pub async fn new(database: &Database, cache: Arc<CacheManager>) -> Result<Self> {
        let collection = database.collection::<Medicine>("medicines");

        let repo = Self {
            collection,
            invalidator: CacheInvalidator::new(cache.clone()),
            cache,
        };
        repo.create_indexes().await?;

        Ok(repo)
    }

    async fn create_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "batch_number": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "name": 1, "generic_name": 1 })
                .build(),
        ];

        self.collection
            .create_indexes(indexes, None)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create medicine indexes: {}", e)))?;

        Ok(())
    }

    /// Fetch a single medicine; absence is a value, not an error.
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Medicine>> {
        let medicine = self
            .collection
            .find_one(doc! {"id": id.to_string()}, None)
            .await?;
        Ok(medicine)
    }

    /// Fetch the catalog, newest first; `page` is 1-based.
    pub async fn find_all(&self, page: Option<u32>) -> Result<Vec<Medicine>> {
        let mut options = FindOptions::builder()
            .sort(doc! {"created_at": -1})
            .build();
        if let Some(page) = page {
            options.skip = Some(u64::from(page.saturating_sub(1)) * u64::from(PAGE_SIZE));
            options.limit = Some(i64::from(PAGE_SIZE));
        }

        let cursor = self.collection.find(doc! {}, options).await?;
        let medicines: Vec<Medicine> = cursor.try_collect().await?;
        Ok(medicines)
    }

    /// Case-insensitive substring search over name and generic name.
    pub async fn search(&self, query: &str, page: Option<u32>) -> Result<Vec<Medicine>> {
        let escaped = regex_escape(query);
        let filter = doc! {
            "$or": [
                {"name": {"$regex": &escaped, "$options": "i"}},
                {"generic_name": {"$regex": &escaped, "$options": "i"}},
            ]
        };

        let mut options = FindOptions::builder()
            .sort(doc! {"created_at": -1})
            .build();
        if let Some(page) = page {
            options.skip = Some(u64::from(page.saturating_sub(1)) * u64::from(PAGE_SIZE));
            options.limit = Some(i64::from(PAGE_SIZE));
        }

        let cursor = self.collection.find(filter, options).await?;
        let medicines: Vec<Medicine> = cursor.try_collect().await?;
        Ok(medicines)
    }

    /// Create a medicine under the mutation locks and invalidate the cache
    /// keys its appearance stales.
    pub async fn create(&self, input: CreateMedicine) -> Result<Medicine> {
        let medicine = input.into_medicine();
        self.validate_featured_rule(&medicine).await?;

        let locks = self
            .cache
            .guard_mutation(&medicine.id)
            .await
            .ok_or_else(busy)?;

        let outcome = self.collection.insert_one(&medicine, None).await;
        if outcome.is_ok() {
            self.invalidator.invalidate_for_mutation(&medicine).await;
        }
        self.cache.release_mutation_locks(locks).await;

        outcome.map_err(|e| AppError::DatabaseError(format!("Failed to create medicine: {}", e)))?;
        info!("created medicine {}", medicine.id);
        Ok(medicine)
    }

    /// Apply a partial update under the mutation locks; returns `None` when
    /// the medicine does not exist.
    pub async fn update(&self, id: &Uuid, input: UpdateMedicine) -> Result<Option<Medicine>> {
        let Some(mut medicine) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        input.apply_to(&mut medicine);
        self.validate_featured_rule(&medicine).await?;

        let locks = self.cache.guard_mutation(id).await.ok_or_else(busy)?;

        let outcome = self
            .collection
            .replace_one(doc! {"id": id.to_string()}, &medicine, None)
            .await;
        if outcome.is_ok() {
            self.invalidator.invalidate_for_mutation(&medicine).await;
        }
        self.cache.release_mutation_locks(locks).await;

        outcome.map_err(|e| AppError::DatabaseError(format!("Failed to update medicine: {}", e)))?;
        info!("updated medicine {}", id);
        Ok(Some(medicine))
    }

    /// Delete a medicine under the mutation locks, invalidating from the
    /// pre-deletion field values. Returns `None` when nothing was deleted.
    pub async fn delete(&self, id: &Uuid) -> Result<Option<Medicine>> {
        // Capture searchable field values before the row disappears
        let Some(medicine) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let locks = self.cache.guard_mutation(id).await.ok_or_else(busy)?;

        let outcome = self
            .collection
            .delete_one(doc! {"id": id.to_string()}, None)
            .await;
        if outcome.is_ok() {
            self.invalidator.invalidate_for_mutation(&medicine).await;
        }
        self.cache.release_mutation_locks(locks).await;

        let result = outcome
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete medicine: {}", e)))?;
        if result.deleted_count == 0 {
            debug!("medicine {} vanished before deletion", id);
            return Ok(None);
        }

        info!("deleted medicine {}", id);
        Ok(Some(medicine))
    }

    /// At most one featured medicine may exist per generic name.
    async fn validate_featured_rule(&self, medicine: &Medicine) -> Result<()> {
        if !medicine.is_featured {
            return Ok(());
        }

        let existing = self
            .collection
            .count_documents(
                doc! {
                    "generic_name": &medicine.generic_name,
                    "is_featured": true,
                    "id": {"$ne": medicine.id.to_string()},
                },
                None,
            )
            .await?;

        if existing > 0 {
            return Err(AppError::ValidationError(format!(
                "There can only be one featured medicine for the generic name '{}'.",
                medicine.generic_name
            )));
        }
        Ok(())
    }
}

fn busy() -> AppError {
    AppError::ServiceBusy("Another update is in progress, please retry shortly.".to_string())
}

/// Escape regex metacharacters so user queries match literally
fn regex_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_escape_neutralizes_metacharacters() {
        assert_eq!(regex_escape("Ibuprofen"), "Ibuprofen");
        assert_eq!(regex_escape("a.b*c"), "a\\.b\\*c");
        assert_eq!(regex_escape("(500mg)"), "\\(500mg\\)");
    }
}
