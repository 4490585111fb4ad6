use crate::commands::inventory::consume_stock_internal;
use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{PartSource, ServiceTicket};
use crate::permissions::require_screen;
use crate::registry::{self, find_by_id, Registry};
use crate::state::AppState;
use axum::extract::{Json, State};
use axum::Extension;
use serde::Deserialize;

/// Service request form: a part either drawn from inventory or sourced
/// from a third-party supplier.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub bus_id: String,
    pub part_source: PartSource,
    #[serde(default)]
    pub part_id: Option<String>,
    #[serde(default)]
    pub external_part_name: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub notes: String,
}

/// Inventory-sourced requests deduct stock through the authoritative
/// consumption guard; an insufficient-stock failure leaves no ticket
/// behind.
pub fn schedule_service_internal(
    registry: &mut Registry,
    request: ServiceRequest,
) -> DoelResult<ServiceTicket> {
    if request.bus_id.trim().is_empty() {
        return Err(DoelError::Validation("A vehicle is required.".to_string()));
    }

    let (part_name, supplier_name) = match request.part_source {
        PartSource::Inventory => {
            let part_id = request.part_id.as_deref().ok_or_else(|| {
                DoelError::Validation("An inventory part must be selected.".to_string())
            })?;
            let part_name = find_by_id(&registry.inventory, part_id)
                .ok_or_else(|| DoelError::NotFound(format!("Inventory item {part_id}")))?
                .name
                .clone();
            consume_stock_internal(registry, part_id, request.quantity)?;
            (part_name, None)
        }
        PartSource::ThirdParty => {
            let part_name = request
                .external_part_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| {
                    DoelError::Validation("External part name is required.".to_string())
                })?;
            (part_name, request.supplier_name.clone())
        }
    };

    let ticket = ServiceTicket {
        id: registry::time_id("SVC-"),
        bus_id: request.bus_id,
        source: request.part_source,
        part_name,
        supplier_name,
        quantity: request.quantity,
        notes: request.notes,
        created_at: registry::today(),
    };
    registry.service_tickets.insert(0, ticket.clone());
    Ok(ticket)
}

pub async fn get_service_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<ServiceTicket>>> {
    require_screen(claims.role, "maintenance")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.service_tickets.clone()))
}

pub async fn schedule_service(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<ServiceRequest>,
) -> DoelResult<Json<ServiceTicket>> {
    require_screen(claims.role, "maintenance")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let ticket = schedule_service_internal(&mut registry, request)?;
    tracing::info!(
        "Service scheduled for {}: {} x{}",
        ticket.bus_id,
        ticket.part_name,
        ticket.quantity
    );
    Ok(Json(ticket))
}
