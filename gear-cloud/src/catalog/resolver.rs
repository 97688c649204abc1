//! Catalog Resolver
//!
//! Turns a free-text name (or an existing id) into a canonical catalog row
//! id, creating the row when no case-insensitive match exists.

use shared::models::CatalogRef;

use super::store::CatalogStore;
use super::{CatalogError, CatalogKind, binding, clean_name};

/// Resolves names against a [`CatalogStore`]
#[derive(Clone, Copy)]
pub struct CatalogResolver<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a dyn CatalogStore {
        self.store
    }

    /// Return the id of the `kind` row named `name` under `parent_id`,
    /// creating it if absent.
    ///
    /// Existing rows are never modified. For categories `parent_id` is the
    /// owning user (`None` = shared).
    pub async fn resolve_or_create(
        &self,
        kind: CatalogKind,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<i64, CatalogError> {
        let name = clean_name(kind, name)?;
        check_parent(kind, parent_id)?;

        if let Some(id) = self.store.find_id(kind, &name, parent_id).await? {
            return Ok(id);
        }

        let id = self.store.insert_if_absent(kind, &name, parent_id).await?;
        tracing::info!(kind = %kind, id, name = %name, parent_id, "Catalog row created");
        Ok(id)
    }

    /// Resolve a reference given either as an id or as a name.
    ///
    /// Ids must exist under `parent_id`: a product id must belong to the
    /// given brand, a variant id to the given product, and a category id
    /// must be visible to the user.
    pub async fn resolve_ref(
        &self,
        kind: CatalogKind,
        reference: &CatalogRef,
        parent_id: Option<i64>,
    ) -> Result<i64, CatalogError> {
        match reference {
            CatalogRef::Id(id) => {
                check_parent(kind, parent_id)?;
                if self.store.exists(kind, *id, parent_id).await? {
                    Ok(*id)
                } else {
                    Err(CatalogError::NotFound { kind, id: *id })
                }
            }
            CatalogRef::Name(name) => self.resolve_or_create(kind, name, parent_id).await,
        }
    }

    /// Resolve a category name for `user_id` and return the user's item
    /// category id.
    ///
    /// The user's own categories win over shared ones; when neither matches
    /// a user-owned category is created. The result is always bound.
    pub async fn resolve_category(&self, user_id: i64, name: &str) -> Result<i64, CatalogError> {
        let category_id = self.find_or_create_category(user_id, name).await?;
        binding::get_or_create_binding(self.store, category_id, user_id).await
    }

    /// [`resolve_category`](Self::resolve_category) for an id-or-name reference
    pub async fn resolve_category_ref(
        &self,
        user_id: i64,
        reference: &CatalogRef,
    ) -> Result<i64, CatalogError> {
        let category_id = match reference {
            CatalogRef::Id(id) => {
                if !self
                    .store
                    .exists(CatalogKind::Category, *id, Some(user_id))
                    .await?
                {
                    return Err(CatalogError::NotFound {
                        kind: CatalogKind::Category,
                        id: *id,
                    });
                }
                *id
            }
            CatalogRef::Name(name) => self.find_or_create_category(user_id, name).await?,
        };
        binding::get_or_create_binding(self.store, category_id, user_id).await
    }

    /// Category id visible to `user_id` for `name`, created user-owned if absent
    pub async fn find_or_create_category(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<i64, CatalogError> {
        let name = clean_name(CatalogKind::Category, name)?;

        if let Some(id) = self
            .store
            .find_id(CatalogKind::Category, &name, Some(user_id))
            .await?
        {
            return Ok(id);
        }
        if let Some(id) = self
            .store
            .find_id(CatalogKind::Category, &name, None)
            .await?
        {
            return Ok(id);
        }

        self.resolve_or_create(CatalogKind::Category, &name, Some(user_id))
            .await
    }
}

fn check_parent(kind: CatalogKind, parent_id: Option<i64>) -> Result<(), CatalogError> {
    if kind.requires_parent() && parent_id.is_none() {
        let parent = match kind {
            CatalogKind::Product => "brand",
            _ => "product",
        };
        return Err(CatalogError::Validation(format!(
            "{kind} requires a {parent}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[tokio::test]
    async fn test_brand_lookup_is_case_insensitive() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let first = resolver
            .resolve_or_create(CatalogKind::Brand, "Osprey", None)
            .await
            .unwrap();
        let second = resolver
            .resolve_or_create(CatalogKind::Brand, "osprey", None)
            .await
            .unwrap();
        let third = resolver
            .resolve_or_create(CatalogKind::Brand, "  OSPREY  ", None)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(store.row_count(CatalogKind::Brand), 1);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let brand = resolver
            .resolve_or_create(CatalogKind::Brand, "Zpacks", None)
            .await
            .unwrap();
        let a = resolver
            .resolve_or_create(CatalogKind::Product, "Duplex", Some(brand))
            .await
            .unwrap();
        let b = resolver
            .resolve_or_create(CatalogKind::Product, "Duplex", Some(brand))
            .await
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(store.row_count(CatalogKind::Product), 1);
    }

    #[tokio::test]
    async fn test_products_are_scoped_by_brand() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let nemo = resolver
            .resolve_or_create(CatalogKind::Brand, "Nemo", None)
            .await
            .unwrap();
        let bd = resolver
            .resolve_or_create(CatalogKind::Brand, "Big Agnes", None)
            .await
            .unwrap();

        let p1 = resolver
            .resolve_or_create(CatalogKind::Product, "Tensor", Some(nemo))
            .await
            .unwrap();
        let p2 = resolver
            .resolve_or_create(CatalogKind::Product, "Tensor", Some(bd))
            .await
            .unwrap();
        assert_ne!(p1, p2);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let err = resolver
            .resolve_or_create(CatalogKind::Brand, "   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyName(CatalogKind::Brand)));
        assert_eq!(store.row_count(CatalogKind::Brand), 0);
    }

    #[tokio::test]
    async fn test_missing_parent_rejected() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let err = resolver
            .resolve_or_create(CatalogKind::Variant, "Large", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "variant requires a product");
    }

    #[tokio::test]
    async fn test_resolve_ref_by_id() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let id = resolver
            .resolve_or_create(CatalogKind::Brand, "Gossamer Gear", None)
            .await
            .unwrap();
        let same = resolver
            .resolve_ref(CatalogKind::Brand, &CatalogRef::Id(id), None)
            .await
            .unwrap();
        assert_eq!(id, same);

        let err = resolver
            .resolve_ref(CatalogKind::Brand, &CatalogRef::Id(9999), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                kind: CatalogKind::Brand,
                id: 9999
            }
        ));
    }

    #[tokio::test]
    async fn test_product_id_must_belong_to_brand() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let nemo = resolver
            .resolve_or_create(CatalogKind::Brand, "Nemo", None)
            .await
            .unwrap();
        let zpacks = resolver
            .resolve_or_create(CatalogKind::Brand, "Zpacks", None)
            .await
            .unwrap();
        let tensor = resolver
            .resolve_or_create(CatalogKind::Product, "Tensor", Some(nemo))
            .await
            .unwrap();
        let regular = resolver
            .resolve_or_create(CatalogKind::Variant, "Regular", Some(tensor))
            .await
            .unwrap();

        let same = resolver
            .resolve_ref(CatalogKind::Product, &CatalogRef::Id(tensor), Some(nemo))
            .await
            .unwrap();
        assert_eq!(same, tensor);

        let err = resolver
            .resolve_ref(CatalogKind::Product, &CatalogRef::Id(tensor), Some(zpacks))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                kind: CatalogKind::Product,
                ..
            }
        ));

        let err = resolver
            .resolve_ref(CatalogKind::Variant, &CatalogRef::Id(regular), Some(9999))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                kind: CatalogKind::Variant,
                ..
            }
        ));

        let err = resolver
            .resolve_ref(CatalogKind::Variant, &CatalogRef::Id(regular), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "variant requires a product");
    }

    #[tokio::test]
    async fn test_category_prefers_own_then_shared() {
        let store = MemoryCatalog::new();
        let shared_id = store.seed_shared_category("Shelter");
        let resolver = CatalogResolver::new(&store);

        // shared match, no user-owned copy created
        let found = resolver.find_or_create_category(1, "shelter").await.unwrap();
        assert_eq!(found, shared_id);
        assert_eq!(store.row_count(CatalogKind::Category), 1);

        // user-owned created for unknown names
        let own = resolver.find_or_create_category(1, "Ditty Bag").await.unwrap();
        assert_ne!(own, shared_id);
        assert_eq!(store.category_owner(own), Some(Some(1)));

        // another user does not see user 1's category
        let other = resolver.find_or_create_category(2, "ditty bag").await.unwrap();
        assert_ne!(other, own);
    }

    #[tokio::test]
    async fn test_category_ref_hidden_from_other_users() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let own = resolver.find_or_create_category(1, "Kitchen").await.unwrap();
        let err = resolver
            .resolve_category_ref(2, &CatalogRef::Id(own))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_category_binds() {
        let store = MemoryCatalog::new();
        let shared_id = store.seed_shared_category("Water");
        let resolver = CatalogResolver::new(&store);

        let binding = resolver.resolve_category(5, "WATER").await.unwrap();
        assert_eq!(store.binding(binding), Some((shared_id, 5, 0)));
    }
}
