use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{SalesDraft, Trip, TripStatus};
use crate::permissions::require_screen;
use crate::registry::{self, find_by_id, find_by_id_mut, remove_by_id, replace_by_id, Registry};
use crate::state::AppState;
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInput {
    /// Coach picked on the form; plate, coach number and capacity are
    /// snapshotted from the register at submit time.
    pub coach_id: String,
    #[serde(default)]
    pub route: String,
    pub departure_time: String,
    pub driver: String,
    #[serde(default)]
    pub guide_name: Option<String>,
    pub status: TripStatus,
    #[serde(default)]
    pub booked_seats: Option<u32>,
}

fn build_trip(
    registry: &Registry,
    id: String,
    input: TripInput,
    previous_booked: u32,
) -> DoelResult<Trip> {
    let coach = find_by_id(&registry.coaches, &input.coach_id)
        .ok_or_else(|| DoelError::NotFound(format!("Coach {}", input.coach_id)))?;

    let booked_seats = input.booked_seats.unwrap_or(previous_booked);
    if booked_seats > coach.seats {
        return Err(DoelError::Validation(format!(
            "Booked seats ({booked_seats}) exceed coach capacity ({})",
            coach.seats
        )));
    }

    let route = if input.route.trim().is_empty() {
        "Undefined Route".to_string()
    } else {
        input.route
    };

    Ok(Trip {
        id,
        bus_number: coach.reg_no.clone(),
        coach_no: coach.coach_no.clone(),
        route,
        departure_time: input.departure_time.replace('T', " "),
        status: input.status,
        driver: input.driver,
        guide_name: input.guide_name,
        capacity: coach.seats,
        booked_seats,
    })
}

pub fn create_trip_internal(registry: &mut Registry, input: TripInput) -> DoelResult<Trip> {
    let trip = build_trip(registry, registry::time_id("T"), input, 0)?;
    registry.trips.insert(0, trip.clone());
    Ok(trip)
}

pub fn update_trip_internal(
    registry: &mut Registry,
    id: &str,
    input: TripInput,
) -> DoelResult<Trip> {
    let previous_booked = find_by_id(&registry.trips, id)
        .ok_or_else(|| DoelError::NotFound(format!("Trip {id}")))?
        .booked_seats;
    let trip = build_trip(registry, id.to_string(), input, previous_booked)?;
    replace_by_id(&mut registry.trips, id, trip.clone());
    Ok(trip)
}

/// Closes out a trip: marks it Completed and stages the prefilled sales
/// draft. Only the latest staged draft survives.
pub fn finalize_trip_internal(registry: &mut Registry, id: &str) -> DoelResult<SalesDraft> {
    let trip = find_by_id_mut(&mut registry.trips, id)
        .ok_or_else(|| DoelError::NotFound(format!("Trip {id}")))?;
    trip.status = TripStatus::Completed;

    let departure_date = trip
        .departure_time
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(SalesDraft {
        trip_id: trip.id.clone(),
        reg_no: trip.bus_number.clone(),
        coach_no: trip.coach_no.clone(),
        driver_name: trip.driver.clone(),
        guide_name: trip.guide_name.clone().unwrap_or_default(),
        departure_date,
        departure_seat_qty: trip.booked_seats,
    })
}

pub async fn get_trips(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<Trip>>> {
    require_screen(claims.role, "scheduling")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.trips.clone()))
}

pub async fn create_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<TripInput>,
) -> DoelResult<Json<Trip>> {
    require_screen(claims.role, "scheduling")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let trip = create_trip_internal(&mut registry, input)?;
    tracing::info!("Scheduled trip {} on {}", trip.id, trip.route);
    Ok(Json(trip))
}

pub async fn update_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<TripInput>,
) -> DoelResult<Json<Trip>> {
    require_screen(claims.role, "scheduling")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let trip = update_trip_internal(&mut registry, &id, input)?;
    Ok(Json(trip))
}

pub async fn delete_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "scheduling")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    remove_by_id(&mut registry.trips, &id)
        .ok_or_else(|| DoelError::NotFound(format!("Trip {id}")))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn finalize_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<SalesDraft>> {
    require_screen(claims.role, "scheduling")?;
    let draft = {
        let mut registry = state
            .registry
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        finalize_trip_internal(&mut registry, &id)?
    };
    if let Ok(mut pending) = state.pending_sale.lock() {
        if pending.is_some() {
            tracing::info!("Overwriting unconsumed sales draft");
        }
        *pending = Some(draft.clone());
    }
    tracing::info!("Trip {} finalized into sales draft", id);
    Ok(Json(draft))
}
