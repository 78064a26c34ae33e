//! Cache key naming for the medicine catalog.
//!
//! Three key families per resource: detail, list and search, each with an
//! optional paged variant, plus the lock names used to serialize writers.
//! The names are deterministic and stable across restarts so they stay
//! compatible with entries written by earlier deployments.

use std::time::Duration;
use uuid::Uuid;

/// Expiry for detail and list entries (15 minutes).
pub const LIST_TTL: Duration = Duration::from_secs(900);
pub const DETAIL_TTL: Duration = Duration::from_secs(900);

/// Expiry for search entries (10 minutes).
pub const SEARCH_TTL: Duration = Duration::from_secs(600);

/// Default lock expiry; a safety net against crashed holders, not a
/// correctness mechanism.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Lock serializing writers against the list/global key family.
pub const LIST_LOCK_KEY: &str = "medicine_list_lock";

pub fn detail_key(id: &Uuid) -> String {
    format!("medicine_detail_{}", id)
}

pub fn list_key(page: Option<u32>) -> String {
    match page {
        Some(n) => format!("medicine_list_page_{}", n),
        None => "medicine_list".to_string(),
    }
}

pub fn search_key(query: &str, page: Option<u32>) -> String {
    match page {
        Some(n) => format!("medicine_search_{}_page_{}", query, n),
        None => format!("medicine_search_{}", query),
    }
}

/// Per-entity lock serializing writers against the same medicine.
pub fn detail_lock_key(id: &Uuid) -> String {
    format!("lock_key_{}", id)
}

/// Glob matching every paged variant of the list family.
pub fn list_page_pattern() -> &'static str {
    "medicine_list_page_*"
}

/// Glob matching every paged variant of one search term's family.
pub fn search_page_pattern(query: &str) -> String {
    format!("medicine_search_{}_page_*", query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_match_deployed_namespace() {
        let id = Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap();

        assert_eq!(
            detail_key(&id),
            "medicine_detail_6ba7b810-9dad-11d1-80b4-00c04fd430c8"
        );
        assert_eq!(list_key(None), "medicine_list");
        assert_eq!(list_key(Some(3)), "medicine_list_page_3");
        assert_eq!(search_key("Ibuprofen", None), "medicine_search_Ibuprofen");
        assert_eq!(
            search_key("Ibuprofen", Some(2)),
            "medicine_search_Ibuprofen_page_2"
        );
        assert_eq!(
            detail_lock_key(&id),
            "lock_key_6ba7b810-9dad-11d1-80b4-00c04fd430c8"
        );
    }

    #[test]
    fn keys_are_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(detail_key(&id), detail_key(&id));
        assert_eq!(search_key("amoxicillin", Some(1)), search_key("amoxicillin", Some(1)));
    }

    #[test]
    fn key_families_are_disjoint_per_instance() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(detail_key(&a), detail_key(&b));
        assert_ne!(detail_lock_key(&a), detail_lock_key(&b));
    }

    #[test]
    fn patterns_cover_paged_variants_only() {
        assert_eq!(list_page_pattern(), "medicine_list_page_*");
        assert_eq!(
            search_page_pattern("Paracetamol"),
            "medicine_search_Paracetamol_page_*"
        );
    }

    #[test]
    fn expiry_policy() {
        assert_eq!(LIST_TTL.as_secs(), 900);
        assert_eq!(DETAIL_TTL.as_secs(), 900);
        assert_eq!(SEARCH_TTL.as_secs(), 600);
    }
}
