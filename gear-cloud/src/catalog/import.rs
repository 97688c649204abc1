//! Bulk item import
//!
//! Each row goes Parse -> Validate -> Resolve -> Stage. A row that fails
//! validation or resolution is rejected with its line number and the
//! import moves on; staged rows are written with one all-or-nothing insert.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use shared::limits;
use shared::units::WeightUnit;
use std::collections::HashMap;
use std::fmt;

use super::resolver::CatalogResolver;
use super::store::{CatalogStore, NewItem, StoreError};
use super::{CatalogError, CatalogKind};

/// One tabular row, all fields as raw text.
///
/// Header names are matched case-insensitively; aliases cover the column
/// names other gear apps export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportRow {
    #[serde(alias = "item")]
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[serde(alias = "model")]
    pub product: Option<String>,
    #[serde(alias = "size")]
    pub variant: Option<String>,
    pub weight: Option<String>,
    #[serde(alias = "units")]
    pub unit: Option<String>,
    #[serde(alias = "cost")]
    pub price: Option<String>,
    pub consumable: Option<String>,
    pub wishlist: Option<String>,
    #[serde(alias = "product_url", alias = "link")]
    pub url: Option<String>,
    pub notes: Option<String>,
}

/// Rejected row; `line` is the 1-based line in the file (header = line 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Outcome of an import whose batch insert succeeded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub accepted: usize,
    pub rejected: Vec<RowError>,
}

/// Import-level failure; no item of the batch was written
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid CSV file: {0}")]
    InvalidFile(String),

    #[error("Import failed: {0}")]
    BatchFailed(#[source] StoreError),
}

/// Row that passed validation, references still unresolved
#[derive(Debug)]
struct StagedRow {
    line: usize,
    name: String,
    category: Option<String>,
    brand: Option<String>,
    product: Option<String>,
    variant: Option<String>,
    weight: Option<f64>,
    unit: Option<WeightUnit>,
    price: Option<f64>,
    consumable: bool,
    wishlist: bool,
    product_url: Option<String>,
    notes: Option<String>,
}

/// Import already-decoded rows; row `i` is reported as line `i + 2`
pub async fn import_rows(
    store: &dyn CatalogStore,
    user_id: i64,
    rows: Vec<ImportRow>,
) -> Result<ImportReport, ImportError> {
    let numbered = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| (i + 2, Ok(row)))
        .collect();
    run(store, user_id, numbered).await
}

/// Import a CSV file with a header line
pub async fn import_csv(
    store: &dyn CatalogStore,
    user_id: i64,
    data: &[u8],
) -> Result<ImportReport, ImportError> {
    let rows = parse_csv(data)?;
    run(store, user_id, rows).await
}

/// Decode CSV bytes into numbered rows. Records that cannot be decoded are
/// kept as per-row errors.
pub fn parse_csv(data: &[u8]) -> Result<Vec<(usize, Result<ImportRow, String>)>, ImportError> {
    if data.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ImportError::InvalidFile("file is empty".into()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ImportError::InvalidFile(e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect::<Vec<_>>()
        .into();
    reader.set_headers(headers.clone());

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let row = result
            .map_err(|e| format!("Malformed row: {e}"))
            .and_then(|record| {
                record
                    .deserialize::<ImportRow>(Some(&headers))
                    .map_err(|e| format!("Malformed row: {e}"))
            });
        rows.push((line, row));
    }
    Ok(rows)
}

async fn run(
    store: &dyn CatalogStore,
    user_id: i64,
    rows: Vec<(usize, Result<ImportRow, String>)>,
) -> Result<ImportReport, ImportError> {
    let total = rows.len();
    let mut rejected = Vec::new();

    // Parse + Validate
    let mut valid = Vec::with_capacity(total);
    for (line, row) in rows {
        match row.and_then(|r| validate(line, r)) {
            Ok(staged) => valid.push(staged),
            Err(message) => rejected.push(RowError { line, message }),
        }
    }

    // Resolve + Stage
    let mut refs = RefCache::new(CatalogResolver::new(store), user_id);
    let mut staged = Vec::with_capacity(valid.len());
    for row in valid {
        match refs.resolve(&row).await {
            Ok(resolved) => staged.push(into_item(user_id, staged.len() as i32, row, resolved)),
            Err(CatalogError::Storage(e)) => return Err(ImportError::BatchFailed(e)),
            Err(e) => rejected.push(RowError {
                line: row.line,
                message: e.to_string(),
            }),
        }
    }

    if !staged.is_empty() {
        store
            .insert_items(&staged)
            .await
            .map_err(ImportError::BatchFailed)?;
    }

    rejected.sort_by_key(|r| r.line);
    tracing::info!(
        user_id,
        total,
        accepted = staged.len(),
        rejected = rejected.len(),
        "Item import finished"
    );

    Ok(ImportReport {
        accepted: staged.len(),
        rejected,
    })
}

fn validate(line: usize, row: ImportRow) -> Result<StagedRow, String> {
    let product = text(row.product);
    let name = text(row.name)
        .or_else(|| product.clone())
        .ok_or_else(|| "Missing item name".to_string())?;

    let unit = match text(row.unit) {
        Some(raw) => Some(raw.parse::<WeightUnit>().map_err(|e| e.to_string())?),
        None => None,
    };

    let staged = StagedRow {
        line,
        name,
        category: text(row.category),
        brand: text(row.brand),
        product,
        variant: text(row.variant),
        weight: parse_number("weight", row.weight)?,
        unit,
        price: parse_number("price", row.price)?,
        consumable: parse_flag("consumable", row.consumable)?,
        wishlist: parse_flag("wishlist", row.wishlist)?,
        product_url: text(row.url),
        notes: text(row.notes),
    };

    check_len("Name", Some(&staged.name), limits::ITEM_NAME_MAX_LEN)?;
    check_len("Brand", staged.brand.as_deref(), limits::BRAND_NAME_MAX_LEN)?;
    check_len("Product", staged.product.as_deref(), limits::PRODUCT_NAME_MAX_LEN)?;
    check_len("Variant", staged.variant.as_deref(), limits::VARIANT_NAME_MAX_LEN)?;
    check_len("Category", staged.category.as_deref(), limits::CATEGORY_NAME_MAX_LEN)?;
    check_len("URL", staged.product_url.as_deref(), limits::PRODUCT_URL_MAX_LEN)?;
    check_len("Notes", staged.notes.as_deref(), limits::NOTES_MAX_LEN)?;
    Ok(staged)
}

/// Column-size check; counts characters
fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value {
        Some(v) if limits::exceeds(v, max) => Err(format!("{field} too long (max {max})")),
        _ => Ok(()),
    }
}

/// Trimmed text; blank means absent
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Non-negative finite number; blank means absent (not zero)
fn parse_number(field: &str, value: Option<String>) -> Result<Option<f64>, String> {
    let Some(raw) = text(value) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(Some(n)),
        _ => Err(format!("Invalid {field}: {raw}")),
    }
}

fn parse_flag(field: &str, value: Option<String>) -> Result<bool, String> {
    let Some(raw) = text(value) else {
        return Ok(false);
    };
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(format!("Invalid {field}: {raw}")),
    }
}

#[derive(Debug, Default)]
struct ResolvedRefs {
    brand_id: Option<i64>,
    product_id: Option<i64>,
    variant_id: Option<i64>,
    item_category_id: Option<i64>,
}

/// Resolver wrapper that hits storage once per distinct name in an import
struct RefCache<'a> {
    resolver: CatalogResolver<'a>,
    user_id: i64,
    ids: HashMap<(CatalogKind, String, Option<i64>), i64>,
}

impl<'a> RefCache<'a> {
    fn new(resolver: CatalogResolver<'a>, user_id: i64) -> Self {
        Self {
            resolver,
            user_id,
            ids: HashMap::new(),
        }
    }

    async fn resolve(&mut self, row: &StagedRow) -> Result<ResolvedRefs, CatalogError> {
        let mut refs = ResolvedRefs::default();

        if let Some(brand) = &row.brand {
            refs.brand_id = Some(self.lookup(CatalogKind::Brand, brand, None).await?);
        }
        if let Some(product) = &row.product {
            let Some(brand_id) = refs.brand_id else {
                return Err(CatalogError::Validation(format!(
                    "Product '{product}' needs a brand"
                )));
            };
            refs.product_id = Some(
                self.lookup(CatalogKind::Product, product, Some(brand_id))
                    .await?,
            );
        }
        if let Some(variant) = &row.variant {
            let Some(product_id) = refs.product_id else {
                return Err(CatalogError::Validation(format!(
                    "Variant '{variant}' needs a product"
                )));
            };
            refs.variant_id = Some(
                self.lookup(CatalogKind::Variant, variant, Some(product_id))
                    .await?,
            );
        }
        if let Some(category) = &row.category {
            refs.item_category_id = Some(
                self.lookup(CatalogKind::Category, category, Some(self.user_id))
                    .await?,
            );
        }

        Ok(refs)
    }

    /// Category lookups return the user's item category id
    async fn lookup(
        &mut self,
        kind: CatalogKind,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<i64, CatalogError> {
        let key = (kind, name.to_lowercase(), parent_id);
        if let Some(id) = self.ids.get(&key) {
            return Ok(*id);
        }

        let id = match kind {
            CatalogKind::Category => self.resolver.resolve_category(self.user_id, name).await?,
            _ => self.resolver.resolve_or_create(kind, name, parent_id).await?,
        };
        self.ids.insert(key, id);
        Ok(id)
    }
}

fn into_item(user_id: i64, sort_order: i32, row: StagedRow, refs: ResolvedRefs) -> NewItem {
    NewItem {
        user_id,
        brand_id: refs.brand_id,
        product_id: refs.product_id,
        product_variant_id: refs.variant_id,
        category_id: refs.item_category_id,
        sort_order,
        name: row.name,
        weight: row.weight,
        unit: row.unit,
        price: row.price,
        consumable: row.consumable,
        product_url: row.product_url,
        wishlist: row.wishlist,
        notes: row.notes,
    }
}
