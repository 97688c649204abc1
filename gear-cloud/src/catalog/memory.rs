//! In-memory [`CatalogStore`]
//!
//! Mirrors the Postgres uniqueness rules under a single lock. Used by the
//! catalog tests and by the import integration tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CatalogKind;
use super::store::{CatalogStore, NewItem, StoreError};

struct Row {
    id: i64,
    scope: Option<i64>,
    name: String,
}

struct Binding {
    id: i64,
    category_id: i64,
    user_id: i64,
    sort_order: i32,
}

#[derive(Default)]
struct State {
    next_id: i64,
    brands: Vec<Row>,
    products: Vec<Row>,
    variants: Vec<Row>,
    categories: Vec<Row>,
    bindings: Vec<Binding>,
    items: Vec<(i64, NewItem)>,
    fail_item_inserts: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn rows(&self, kind: CatalogKind) -> &Vec<Row> {
        match kind {
            CatalogKind::Brand => &self.brands,
            CatalogKind::Product => &self.products,
            CatalogKind::Variant => &self.variants,
            CatalogKind::Category => &self.categories,
        }
    }

    fn rows_mut(&mut self, kind: CatalogKind) -> &mut Vec<Row> {
        match kind {
            CatalogKind::Brand => &mut self.brands,
            CatalogKind::Product => &mut self.products,
            CatalogKind::Variant => &mut self.variants,
            CatalogKind::Category => &mut self.categories,
        }
    }

    fn find(&self, kind: CatalogKind, name: &str, scope: Option<i64>) -> Option<i64> {
        let scope = if kind == CatalogKind::Brand { None } else { scope };
        let needle = name.to_lowercase();
        self.rows(kind)
            .iter()
            .find(|r| r.scope == scope && r.name.to_lowercase() == needle)
            .map(|r| r.id)
    }
}

/// Catalog store kept in process memory
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<State>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shared (ownerless) category
    pub fn seed_shared_category(&self, name: &str) -> i64 {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.categories.push(Row {
            id,
            scope: None,
            name: name.to_string(),
        });
        id
    }

    /// Make subsequent [`insert_items`](CatalogStore::insert_items) calls fail
    pub fn set_fail_item_inserts(&self, fail: bool) {
        self.state.lock().fail_item_inserts = fail;
    }

    pub fn row_count(&self, kind: CatalogKind) -> usize {
        self.state.lock().rows(kind).len()
    }

    /// Owner of a category: `Some(None)` for shared, `None` if absent
    pub fn category_owner(&self, id: i64) -> Option<Option<i64>> {
        self.state
            .lock()
            .categories
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.scope)
    }

    /// `(category_id, user_id, sort_order)` of a binding
    pub fn binding(&self, id: i64) -> Option<(i64, i64, i32)> {
        self.state
            .lock()
            .bindings
            .iter()
            .find(|b| b.id == id)
            .map(|b| (b.category_id, b.user_id, b.sort_order))
    }

    /// Binding ids of a user, in creation order
    pub fn bindings_for(&self, user_id: i64) -> Vec<i64> {
        self.state
            .lock()
            .bindings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.id)
            .collect()
    }

    pub fn remove_binding(&self, id: i64) {
        self.state.lock().bindings.retain(|b| b.id != id);
    }

    /// Inserted items with their ids
    pub fn items(&self) -> Vec<(i64, NewItem)> {
        self.state.lock().items.clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_id(
        &self,
        kind: CatalogKind,
        name: &str,
        scope: Option<i64>,
    ) -> Result<Option<i64>, StoreError> {
        Ok(self.state.lock().find(kind, name, scope))
    }

    async fn insert_if_absent(
        &self,
        kind: CatalogKind,
        name: &str,
        scope: Option<i64>,
    ) -> Result<i64, StoreError> {
        let mut state = self.state.lock();
        if let Some(id) = state.find(kind, name, scope) {
            return Ok(id);
        }
        let id = state.next_id();
        let scope = if kind == CatalogKind::Brand { None } else { scope };
        state.rows_mut(kind).push(Row {
            id,
            scope,
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn exists(
        &self,
        kind: CatalogKind,
        id: i64,
        scope: Option<i64>,
    ) -> Result<bool, StoreError> {
        let state = self.state.lock();
        Ok(state.rows(kind).iter().any(|r| {
            r.id == id
                && match kind {
                    CatalogKind::Brand => true,
                    CatalogKind::Category => r.scope.is_none() || r.scope == scope,
                    CatalogKind::Product | CatalogKind::Variant => r.scope == scope,
                }
        }))
    }

    async fn find_binding(
        &self,
        category_id: i64,
        user_id: i64,
    ) -> Result<Option<i64>, StoreError> {
        Ok(self
            .state
            .lock()
            .bindings
            .iter()
            .find(|b| b.category_id == category_id && b.user_id == user_id)
            .map(|b| b.id))
    }

    async fn insert_binding_if_absent(
        &self,
        category_id: i64,
        user_id: i64,
    ) -> Result<i64, StoreError> {
        let mut state = self.state.lock();
        if !state.categories.iter().any(|r| r.id == category_id) {
            return Err(StoreError::Rejected(format!(
                "category {category_id} does not exist"
            )));
        }
        if let Some(b) = state
            .bindings
            .iter()
            .find(|b| b.category_id == category_id && b.user_id == user_id)
        {
            return Ok(b.id);
        }
        let sort_order = state.bindings.iter().filter(|b| b.user_id == user_id).count() as i32;
        let id = state.next_id();
        state.bindings.push(Binding {
            id,
            category_id,
            user_id,
            sort_order,
        });
        Ok(id)
    }

    async fn insert_items(&self, items: &[NewItem]) -> Result<Vec<i64>, StoreError> {
        let mut state = self.state.lock();
        if state.fail_item_inserts {
            return Err(StoreError::Rejected("item insert refused".into()));
        }
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = state.next_id();
            state.items.push((id, item.clone()));
            ids.push(id);
        }
        Ok(ids)
    }
}
