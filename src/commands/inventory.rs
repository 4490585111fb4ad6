use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::InventoryItem;
use crate::permissions::require_screen;
use crate::registry::{self, find_by_id_mut, remove_by_id, replace_by_id, Registry};
use crate::state::AppState;
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryInput {
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub min_stock: u32,
    pub unit: String,
}

fn validate(input: &InventoryInput) -> DoelResult<()> {
    if input.name.trim().is_empty() || input.unit.trim().is_empty() {
        return Err(DoelError::Validation(
            "Item name and unit are required.".to_string(),
        ));
    }
    Ok(())
}

pub fn create_item_internal(
    registry: &mut Registry,
    input: InventoryInput,
) -> DoelResult<InventoryItem> {
    validate(&input)?;
    let item = InventoryItem {
        id: registry::time_id("INV"),
        name: input.name,
        category: input.category,
        stock: input.stock,
        min_stock: input.min_stock,
        unit: input.unit,
        last_updated: registry::today(),
    };
    registry.inventory.insert(0, item.clone());
    Ok(item)
}

pub fn update_item_internal(
    registry: &mut Registry,
    id: &str,
    input: InventoryInput,
) -> DoelResult<InventoryItem> {
    validate(&input)?;
    let item = InventoryItem {
        id: id.to_string(),
        name: input.name,
        category: input.category,
        stock: input.stock,
        min_stock: input.min_stock,
        unit: input.unit,
        last_updated: registry::today(),
    };
    if !replace_by_id(&mut registry.inventory, id, item.clone()) {
        return Err(DoelError::NotFound(format!("Inventory item {id}")));
    }
    Ok(item)
}

/// The single authoritative stock guard: consumption fails when the
/// request exceeds what is on hand, leaving the stock untouched. Stock
/// can never go negative.
pub fn consume_stock_internal(
    registry: &mut Registry,
    item_id: &str,
    quantity: u32,
) -> DoelResult<InventoryItem> {
    if quantity == 0 {
        return Err(DoelError::Validation(
            "Consumption quantity must be positive.".to_string(),
        ));
    }
    let item = find_by_id_mut(&mut registry.inventory, item_id)
        .ok_or_else(|| DoelError::NotFound(format!("Inventory item {item_id}")))?;
    if quantity > item.stock {
        return Err(DoelError::InsufficientStock {
            name: item.name.clone(),
            unit: item.unit.clone(),
            stock: item.stock,
            requested: quantity,
        });
    }
    item.stock -= quantity;
    item.last_updated = registry::today();
    Ok(item.clone())
}

pub fn low_stock_count(registry: &Registry) -> usize {
    registry
        .inventory
        .iter()
        .filter(|item| item.stock <= item.min_stock)
        .count()
}

pub async fn get_inventory(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<InventoryItem>>> {
    require_screen(claims.role, "inventory")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.inventory.clone()))
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<InventoryInput>,
) -> DoelResult<Json<InventoryItem>> {
    require_screen(claims.role, "inventory")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let item = create_item_internal(&mut registry, input)?;
    Ok(Json(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<InventoryInput>,
) -> DoelResult<Json<InventoryItem>> {
    require_screen(claims.role, "inventory")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let item = update_item_internal(&mut registry, &id, input)?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "inventory")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    remove_by_id(&mut registry.inventory, &id)
        .ok_or_else(|| DoelError::NotFound(format!("Inventory item {id}")))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeRequest {
    pub quantity: u32,
}

pub async fn consume_stock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<ConsumeRequest>,
) -> DoelResult<Json<InventoryItem>> {
    require_screen(claims.role, "inventory")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let item = consume_stock_internal(&mut registry, &id, request.quantity)?;
    tracing::info!(
        "Consumed {} {} of {} ({} left)",
        request.quantity,
        item.unit,
        item.name,
        item.stock
    );
    Ok(Json(item))
}
