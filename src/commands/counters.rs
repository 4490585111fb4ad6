use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::Counter;
use crate::permissions::require_screen;
use crate::registry::{self, find_by_id, remove_by_id, replace_by_id, Registry};
use crate::state::AppState;
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterInput {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub assigned_operator_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn validate(registry: &Registry, input: &CounterInput) -> DoelResult<()> {
    if input.name.trim().is_empty() || input.location.trim().is_empty() {
        return Err(DoelError::Validation(
            "Counter name and location are required.".to_string(),
        ));
    }
    // Operator assignment must point at a real account.
    if let Some(operator_id) = input.assigned_operator_id.as_deref() {
        if find_by_id(&registry.users, operator_id).is_none() {
            return Err(DoelError::Validation(format!(
                "Assigned operator {operator_id} does not exist"
            )));
        }
    }
    Ok(())
}

pub fn create_counter_internal(
    registry: &mut Registry,
    input: CounterInput,
) -> DoelResult<Counter> {
    validate(registry, &input)?;
    let counter = Counter {
        id: registry::time_id("CNT-"),
        name: input.name,
        location: input.location,
        assigned_operator_id: input.assigned_operator_id.filter(|id| !id.is_empty()),
        is_active: input.is_active,
        last_sync: None,
    };
    registry.counters.insert(0, counter.clone());
    Ok(counter)
}

pub fn update_counter_internal(
    registry: &mut Registry,
    id: &str,
    input: CounterInput,
) -> DoelResult<Counter> {
    validate(registry, &input)?;
    let last_sync = find_by_id(&registry.counters, id)
        .ok_or_else(|| DoelError::NotFound(format!("Counter {id}")))?
        .last_sync
        .clone();
    let counter = Counter {
        id: id.to_string(),
        name: input.name,
        location: input.location,
        assigned_operator_id: input.assigned_operator_id.filter(|id| !id.is_empty()),
        is_active: input.is_active,
        last_sync,
    };
    replace_by_id(&mut registry.counters, id, counter.clone());
    Ok(counter)
}

pub async fn get_counters(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<Counter>>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.counters.clone()))
}

pub async fn create_counter(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CounterInput>,
) -> DoelResult<Json<Counter>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let counter = create_counter_internal(&mut registry, input)?;
    tracing::info!("Counter '{}' opened at {}", counter.name, counter.location);
    Ok(Json(counter))
}

pub async fn update_counter(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<CounterInput>,
) -> DoelResult<Json<Counter>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let counter = update_counter_internal(&mut registry, &id, input)?;
    Ok(Json(counter))
}

pub async fn delete_counter(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    remove_by_id(&mut registry.counters, &id)
        .ok_or_else(|| DoelError::NotFound(format!("Counter {id}")))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
