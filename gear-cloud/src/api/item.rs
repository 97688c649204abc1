//! Item endpoints
//!
//! Brand / product / variant / category fields accept an existing id or a
//! free-text name; names go through [`CatalogResolver`].

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::limits;
use shared::models::{CatalogRef, Item, ItemCreate, ItemUpdate, ItemView, SortOrderUpdate};
use shared::units::WeightUnit;

use crate::auth::UserIdentity;
use crate::catalog::{CatalogError, CatalogKind, CatalogResolver, NewItem, clean_name};
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

/// Catalog ids of an item
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct ItemRefs {
    brand_id: Option<i64>,
    product_id: Option<i64>,
    variant_id: Option<i64>,
    item_category_id: Option<i64>,
}

/// Resolve the references present in a request on top of `current`.
///
/// A product is looked up under the resolved (or current) brand and a
/// variant under the resolved (or current) product. Changing the brand
/// drops the current product and variant; changing the product drops the
/// current variant.
async fn resolve_refs(
    resolver: CatalogResolver<'_>,
    user_id: i64,
    current: ItemRefs,
    brand: Option<&CatalogRef>,
    product: Option<&CatalogRef>,
    variant: Option<&CatalogRef>,
    category: Option<&CatalogRef>,
) -> Result<ItemRefs, CatalogError> {
    let mut refs = current;

    if let Some(brand) = brand {
        let brand_id = resolver.resolve_ref(CatalogKind::Brand, brand, None).await?;
        if refs.brand_id != Some(brand_id) {
            refs.product_id = None;
            refs.variant_id = None;
        }
        refs.brand_id = Some(brand_id);
    }
    if let Some(product) = product {
        let product_id = resolver
            .resolve_ref(CatalogKind::Product, product, refs.brand_id)
            .await?;
        if refs.product_id != Some(product_id) {
            refs.variant_id = None;
        }
        refs.product_id = Some(product_id);
    }
    if let Some(variant) = variant {
        refs.variant_id = Some(
            resolver
                .resolve_ref(CatalogKind::Variant, variant, refs.product_id)
                .await?,
        );
    }
    if let Some(category) = category {
        refs.item_category_id = Some(resolver.resolve_category_ref(user_id, category).await?);
    }

    Ok(refs)
}

fn check_amount(field: &str, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::with_message(
            ErrorCode::InvalidNumber,
            format!("Invalid {field}: {v}"),
        )),
        _ => Ok(()),
    }
}

fn parse_unit(raw: Option<&str>) -> Result<Option<WeightUnit>, AppError> {
    raw.map(|token| {
        token
            .parse::<WeightUnit>()
            .map_err(|e| AppError::with_message(ErrorCode::InvalidWeightUnit, e.to_string()))
    })
    .transpose()
}

fn clean_item_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Item name is required"));
    }
    check_len("Name", name, limits::ITEM_NAME_MAX_LEN)?;
    Ok(name.to_string())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if limits::exceeds(value, max) {
        return Err(AppError::validation(format!("{field} too long (max {max})"))
            .with_detail("max", max));
    }
    Ok(())
}

fn check_ref_name(kind: CatalogKind, reference: Option<&CatalogRef>) -> Result<(), AppError> {
    if let Some(CatalogRef::Name(name)) = reference {
        clean_name(kind, name)?;
    }
    Ok(())
}

/// Field checks shared by create and update; nothing is written before they pass
fn check_fields(
    weight: Option<f64>,
    price: Option<f64>,
    unit: Option<&str>,
    product_url: Option<&str>,
    notes: Option<&str>,
    catalog: [(CatalogKind, Option<&CatalogRef>); 4],
) -> Result<Option<WeightUnit>, AppError> {
    check_amount("weight", weight)?;
    check_amount("price", price)?;
    let unit = parse_unit(unit)?;
    if let Some(url) = product_url {
        check_len("Product URL", url, limits::PRODUCT_URL_MAX_LEN)?;
    }
    if let Some(notes) = notes {
        check_len("Notes", notes, limits::NOTES_MAX_LEN)?;
    }
    for (kind, reference) in catalog {
        check_ref_name(kind, reference)?;
    }
    Ok(unit)
}

/// Validate a create payload, then resolve its catalog references
async fn prepare_create(
    resolver: CatalogResolver<'_>,
    user_id: i64,
    data: ItemCreate,
) -> Result<NewItem, AppError> {
    let name = clean_item_name(&data.name)?;
    let unit = check_fields(
        data.weight,
        data.price,
        data.unit.as_deref(),
        data.product_url.as_deref(),
        data.notes.as_deref(),
        [
            (CatalogKind::Brand, data.brand.as_ref()),
            (CatalogKind::Product, data.product.as_ref()),
            (CatalogKind::Variant, data.variant.as_ref()),
            (CatalogKind::Category, data.category.as_ref()),
        ],
    )?;

    let refs = resolve_refs(
        resolver,
        user_id,
        ItemRefs::default(),
        data.brand.as_ref(),
        data.product.as_ref(),
        data.variant.as_ref(),
        data.category.as_ref(),
    )
    .await?;

    Ok(NewItem {
        user_id,
        brand_id: refs.brand_id,
        product_id: refs.product_id,
        product_variant_id: refs.variant_id,
        category_id: refs.item_category_id,
        // appended after the user's last item on insert
        sort_order: 0,
        name,
        weight: data.weight,
        unit,
        price: data.price,
        consumable: data.consumable,
        product_url: data.product_url,
        wishlist: data.wishlist,
        notes: data.notes,
    })
}

/// Validate an update payload, then merge it over `current`
async fn prepare_update(
    resolver: CatalogResolver<'_>,
    user_id: i64,
    current: Item,
    data: ItemUpdate,
) -> Result<NewItem, AppError> {
    let name = match &data.name {
        Some(name) => clean_item_name(name)?,
        None => current.name.clone(),
    };
    let unit = check_fields(
        data.weight,
        data.price,
        data.unit.as_deref(),
        data.product_url.as_deref(),
        data.notes.as_deref(),
        [
            (CatalogKind::Brand, data.brand.as_ref()),
            (CatalogKind::Product, data.product.as_ref()),
            (CatalogKind::Variant, data.variant.as_ref()),
            (CatalogKind::Category, data.category.as_ref()),
        ],
    )?;

    let refs = resolve_refs(
        resolver,
        user_id,
        ItemRefs {
            brand_id: current.brand_id,
            product_id: current.product_id,
            variant_id: current.product_variant_id,
            item_category_id: current.category_id,
        },
        data.brand.as_ref(),
        data.product.as_ref(),
        data.variant.as_ref(),
        data.category.as_ref(),
    )
    .await?;

    Ok(NewItem {
        user_id,
        brand_id: refs.brand_id,
        product_id: refs.product_id,
        product_variant_id: refs.variant_id,
        category_id: refs.item_category_id,
        sort_order: current.sort_order,
        unit: unit.or_else(|| current.weight_unit()),
        name,
        weight: data.weight.or(current.weight),
        price: data.price.or(current.price),
        consumable: data.consumable.unwrap_or(current.consumable),
        product_url: data.product_url.or(current.product_url),
        wishlist: data.wishlist.unwrap_or(current.wishlist),
        notes: data.notes.or(current.notes),
    })
}

/// POST /item
pub async fn create_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(data): Json<ItemCreate>,
) -> ApiResult<Item> {
    let resolver = CatalogResolver::new(&state.catalog);
    let new_item = prepare_create(resolver, identity.user_id, data).await?;

    let item = db::items::create(&state.pool, &new_item)
        .await
        .map_err(internal)?;
    tracing::info!(user_id = identity.user_id, item_id = item.id, "Item created");
    Ok(Json(item))
}

/// PUT /item/{item_id}
///
/// Fields left out keep their value
pub async fn update_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(item_id): Path<i64>,
    Json(data): Json<ItemUpdate>,
) -> ApiResult<Item> {
    let current = db::items::find(&state.pool, identity.user_id, item_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound))?;

    let resolver = CatalogResolver::new(&state.catalog);
    let merged = prepare_update(resolver, identity.user_id, current, data).await?;

    let item = db::items::update(&state.pool, item_id, &merged)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound))?;
    Ok(Json(item))
}

/// GET /items
pub async fn list_items(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<ItemView>> {
    let items = db::items::list(&state.pool, identity.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(items))
}

/// DELETE /item/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(item_id): Path<i64>,
) -> ApiResult<bool> {
    let removed = db::items::soft_delete(&state.pool, identity.user_id, item_id)
        .await
        .map_err(internal)?;
    if !removed {
        return Err(AppError::new(ErrorCode::ItemNotFound));
    }
    tracing::info!(user_id = identity.user_id, item_id, "Item removed");
    Ok(Json(true))
}

/// PUT /item/sort
pub async fn sort_items(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(updates): Json<Vec<SortOrderUpdate>>,
) -> ApiResult<bool> {
    db::items::batch_update_sort_order(&state.pool, identity.user_id, &updates)
        .await
        .map_err(internal)?;
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[test]
    fn test_parse_unit_synonyms() {
        assert_eq!(parse_unit(Some("Pounds")).unwrap(), Some(WeightUnit::Lb));
        assert_eq!(parse_unit(None).unwrap(), None);

        let err = parse_unit(Some("xyz")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWeightUnit);
        assert_eq!(err.message, "Invalid unit: xyz");
    }

    #[tokio::test]
    async fn test_resolve_refs_by_name() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);

        let refs = resolve_refs(
            resolver,
            1,
            ItemRefs::default(),
            Some(&CatalogRef::Name("Osprey".into())),
            Some(&CatalogRef::Name("Exos 58".into())),
            Some(&CatalogRef::Name("Large".into())),
            Some(&CatalogRef::Name("Packs".into())),
        )
        .await
        .unwrap();

        assert!(refs.brand_id.is_some());
        assert!(refs.product_id.is_some());
        assert!(refs.variant_id.is_some());
        let binding = refs.item_category_id.unwrap();
        assert!(store.binding(binding).is_some());
    }

    #[tokio::test]
    async fn test_product_uses_current_brand() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);
        let brand = resolver
            .resolve_or_create(CatalogKind::Brand, "Nemo", None)
            .await
            .unwrap();

        let current = ItemRefs {
            brand_id: Some(brand),
            ..Default::default()
        };
        let refs = resolve_refs(
            resolver,
            1,
            current,
            None,
            Some(&CatalogRef::Name("Tensor".into())),
            None,
            None,
        )
        .await
        .unwrap();
        assert_eq!(refs.brand_id, Some(brand));
        let again = resolver
            .resolve_or_create(CatalogKind::Product, "tensor", Some(brand))
            .await
            .unwrap();
        assert_eq!(refs.product_id, Some(again));
    }

    #[tokio::test]
    async fn test_product_without_brand_rejected() {
        let store = MemoryCatalog::new();
        let err = resolve_refs(
            CatalogResolver::new(&store),
            1,
            ItemRefs::default(),
            None,
            Some(&CatalogRef::Name("Tensor".into())),
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(err.is_validation());
    }

    fn stored_item(refs: ItemRefs) -> Item {
        Item {
            id: 10,
            user_id: 1,
            brand_id: refs.brand_id,
            product_id: refs.product_id,
            product_variant_id: refs.variant_id,
            category_id: refs.item_category_id,
            sort_order: 3,
            removed: false,
            name: "Tent".into(),
            weight: Some(1.2),
            unit: Some("kg".into()),
            price: None,
            consumable: false,
            product_url: None,
            wishlist: false,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_bad_unit_creates_no_catalog_rows() {
        let store = MemoryCatalog::new();
        let data = ItemCreate {
            name: "Stove".into(),
            brand: Some(CatalogRef::Name("NewCo".into())),
            category: Some(CatalogRef::Name("Foo".into())),
            unit: Some("furlongs".into()),
            ..Default::default()
        };

        let err = prepare_create(CatalogResolver::new(&store), 1, data)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWeightUnit);
        assert_eq!(store.row_count(CatalogKind::Brand), 0);
        assert_eq!(store.row_count(CatalogKind::Category), 0);
        assert!(store.bindings_for(1).is_empty());
    }

    #[tokio::test]
    async fn test_bad_update_creates_no_catalog_rows() {
        let store = MemoryCatalog::new();
        let data = ItemUpdate {
            brand: Some(CatalogRef::Name("NewCo".into())),
            category: Some(CatalogRef::Name("Foo".into())),
            notes: Some("n".repeat(limits::NOTES_MAX_LEN + 1)),
            ..Default::default()
        };

        let err = prepare_update(
            CatalogResolver::new(&store),
            1,
            stored_item(ItemRefs::default()),
            data,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Notes too long (max 1000)");
        assert_eq!(store.row_count(CatalogKind::Brand), 0);
        assert_eq!(store.row_count(CatalogKind::Category), 0);
        assert!(store.bindings_for(1).is_empty());
    }

    #[tokio::test]
    async fn test_overlong_catalog_name_rejected_first() {
        let store = MemoryCatalog::new();
        let data = ItemCreate {
            name: "Quilt".into(),
            brand: Some(CatalogRef::Name("Enlightened".into())),
            category: Some(CatalogRef::Name("c".repeat(51))),
            ..Default::default()
        };

        let err = prepare_create(CatalogResolver::new(&store), 1, data)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(store.row_count(CatalogKind::Brand), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let store = MemoryCatalog::new();
        let data = ItemUpdate {
            unit: Some("Pounds".into()),
            ..Default::default()
        };

        let merged = prepare_update(
            CatalogResolver::new(&store),
            1,
            stored_item(ItemRefs::default()),
            data,
        )
        .await
        .unwrap();
        assert_eq!(merged.name, "Tent");
        assert_eq!(merged.unit, Some(WeightUnit::Lb));
        assert_eq!(merged.weight, Some(1.2));
        assert_eq!(merged.sort_order, 3);
    }

    #[tokio::test]
    async fn test_brand_change_drops_product_and_variant() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);
        let nemo = resolver
            .resolve_or_create(CatalogKind::Brand, "Nemo", None)
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
        let current = ItemRefs {
            brand_id: Some(nemo),
            product_id: Some(tensor),
            variant_id: Some(regular),
            item_category_id: None,
        };

        // same brand by name keeps the product line
        let refs = resolve_refs(
            resolver,
            1,
            current,
            Some(&CatalogRef::Name("NEMO".into())),
            None,
            None,
            None,
        )
        .await
        .unwrap();
        assert_eq!(refs, current);

        let refs = resolve_refs(
            resolver,
            1,
            current,
            Some(&CatalogRef::Name("Therm-a-Rest".into())),
            None,
            None,
            None,
        )
        .await
        .unwrap();
        assert_ne!(refs.brand_id, Some(nemo));
        assert_eq!(refs.product_id, None);
        assert_eq!(refs.variant_id, None);

        let refs = resolve_refs(
            resolver,
            1,
            current,
            None,
            Some(&CatalogRef::Name("Switchback".into())),
            None,
            None,
        )
        .await
        .unwrap();
        assert_eq!(refs.brand_id, Some(nemo));
        assert_ne!(refs.product_id, Some(tensor));
        assert_eq!(refs.variant_id, None);
    }

    #[tokio::test]
    async fn test_product_id_from_other_brand_rejected() {
        let store = MemoryCatalog::new();
        let resolver = CatalogResolver::new(&store);
        let nemo = resolver
            .resolve_or_create(CatalogKind::Brand, "Nemo", None)
            .await
            .unwrap();
        let tensor = resolver
            .resolve_or_create(CatalogKind::Product, "Tensor", Some(nemo))
            .await
            .unwrap();

        let err = resolve_refs(
            resolver,
            1,
            ItemRefs::default(),
            Some(&CatalogRef::Name("Zpacks".into())),
            Some(&CatalogRef::Id(tensor)),
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                kind: CatalogKind::Product,
                ..
            }
        ));
    }

    #[test]
    fn test_check_amount() {
        assert!(check_amount("weight", None).is_ok());
        assert!(check_amount("weight", Some(0.0)).is_ok());
        assert!(check_amount("weight", Some(-1.0)).is_err());
        assert!(check_amount("price", Some(f64::NAN)).is_err());
    }
}
