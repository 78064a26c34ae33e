use std::sync::Arc;
use tracing::info;

use crate::cache::{keys, CacheManager};
use crate::models::Medicine;

/// Computes and removes the cache keys a medicine mutation may have staled.
///
/// Fired after every successful create, update and delete; for deletes the
/// caller passes the pre-deletion record so the searchable field values are
/// still known. Every constituent operation is a hard delete, so firing
/// twice for the same mutation is harmless.
pub struct CacheInvalidator {
    cache: Arc<CacheManager>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Invalidate everything whose content could include `medicine`:
    /// its detail key, the whole list family, and the search families for
    /// each of its searchable field values (name and generic name, the
    /// conservative approximation keyed by literal field values).
    pub async fn invalidate_for_mutation(&self, medicine: &Medicine) {
        self.cache.delete(&keys::detail_key(&medicine.id)).await;

        self.cache.delete(&keys::list_key(None)).await;
        self.cache.delete_pattern(keys::list_page_pattern()).await;

        for term in medicine.searchable_terms() {
            self.cache.delete(&keys::search_key(term, None)).await;
            self.cache
                .delete_pattern(&keys::search_page_pattern(term))
                .await;
        }

        info!(
            "Cache invalidated for medicine ID {} and related keys.",
            medicine.id
        );
    }
}
