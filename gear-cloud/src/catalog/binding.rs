//! Per-user category binding

use super::CatalogError;
use super::store::CatalogStore;

/// Return the user's item category for `category_id`, creating it on first
/// use.
///
/// A new binding is appended: its `sort_order` is the number of bindings the
/// user already has. Positions freed by deletions are not reused, so two
/// bindings can end up sharing a position.
pub async fn get_or_create_binding(
    store: &dyn CatalogStore,
    category_id: i64,
    user_id: i64,
) -> Result<i64, CatalogError> {
    if let Some(id) = store.find_binding(category_id, user_id).await? {
        return Ok(id);
    }

    let id = store.insert_binding_if_absent(category_id, user_id).await?;
    tracing::debug!(category_id, user_id, item_category_id = id, "Item category bound");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogKind, MemoryCatalog};

    #[tokio::test]
    async fn test_first_use_creates_one_binding() {
        let store = MemoryCatalog::new();
        let shelter = store.seed_shared_category("Shelter");
        let sleep = store.seed_shared_category("Sleep");

        let first = get_or_create_binding(&store, shelter, 1).await.unwrap();
        assert_eq!(store.binding(first), Some((shelter, 1, 0)));

        let again = get_or_create_binding(&store, shelter, 1).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(store.bindings_for(1).len(), 1);

        // second category goes to the end of the user's list
        let second = get_or_create_binding(&store, sleep, 1).await.unwrap();
        assert_eq!(store.binding(second), Some((sleep, 1, 1)));
    }

    #[tokio::test]
    async fn test_sort_order_counts_only_own_bindings() {
        let store = MemoryCatalog::new();
        let a = store.seed_shared_category("A");
        let b = store.seed_shared_category("B");

        get_or_create_binding(&store, a, 1).await.unwrap();
        get_or_create_binding(&store, b, 1).await.unwrap();

        let other = get_or_create_binding(&store, a, 2).await.unwrap();
        assert_eq!(store.binding(other), Some((a, 2, 0)));
        assert_eq!(store.row_count(CatalogKind::Category), 2);
    }

    #[tokio::test]
    async fn test_sort_order_after_removal_may_collide() {
        let store = MemoryCatalog::new();
        let a = store.seed_shared_category("A");
        let b = store.seed_shared_category("B");
        let c = store.seed_shared_category("C");

        let first = get_or_create_binding(&store, a, 1).await.unwrap();
        get_or_create_binding(&store, b, 1).await.unwrap();
        store.remove_binding(first);

        let third = get_or_create_binding(&store, c, 1).await.unwrap();
        // count is 1 again, which equals B's position
        assert_eq!(store.binding(third), Some((c, 1, 1)));
    }
}
