use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{Coach, CoachStatus};
use crate::permissions::require_screen;
use crate::registry::{self, remove_by_id, replace_by_id, Registry};
use crate::state::AppState;
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachInput {
    pub coach_no: String,
    pub reg_no: String,
    pub seats: u32,
    pub status: CoachStatus,
    #[serde(default)]
    pub gps_device_id: Option<String>,
}

fn validate(input: &CoachInput) -> DoelResult<()> {
    if input.coach_no.trim().is_empty() || input.reg_no.trim().is_empty() {
        return Err(DoelError::Validation(
            "Coach number and registration number are required.".to_string(),
        ));
    }
    if input.seats == 0 {
        return Err(DoelError::Validation(
            "Seat capacity must be a positive number.".to_string(),
        ));
    }
    Ok(())
}

pub fn create_coach_internal(registry: &mut Registry, input: CoachInput) -> DoelResult<Coach> {
    validate(&input)?;
    let coach = Coach {
        id: registry::time_id("C"),
        coach_no: input.coach_no,
        reg_no: input.reg_no,
        seats: input.seats,
        status: input.status,
        gps_device_id: input.gps_device_id,
    };
    registry.coaches.insert(0, coach.clone());
    Ok(coach)
}

pub fn update_coach_internal(
    registry: &mut Registry,
    id: &str,
    input: CoachInput,
) -> DoelResult<Coach> {
    validate(&input)?;
    let coach = Coach {
        id: id.to_string(),
        coach_no: input.coach_no,
        reg_no: input.reg_no,
        seats: input.seats,
        status: input.status,
        gps_device_id: input.gps_device_id,
    };
    if !replace_by_id(&mut registry.coaches, id, coach.clone()) {
        return Err(DoelError::NotFound(format!("Coach {id}")));
    }
    Ok(coach)
}

pub async fn get_coaches(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<Coach>>> {
    require_screen(claims.role, "coachRegister")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.coaches.clone()))
}

pub async fn create_coach(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CoachInput>,
) -> DoelResult<Json<Coach>> {
    require_screen(claims.role, "coachRegister")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let coach = create_coach_internal(&mut registry, input)?;
    tracing::info!("Registered coach {} ({})", coach.coach_no, coach.reg_no);
    Ok(Json(coach))
}

pub async fn update_coach(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<CoachInput>,
) -> DoelResult<Json<Coach>> {
    require_screen(claims.role, "coachRegister")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let coach = update_coach_internal(&mut registry, &id, input)?;
    Ok(Json(coach))
}

pub async fn delete_coach(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "coachRegister")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    remove_by_id(&mut registry.coaches, &id)
        .ok_or_else(|| DoelError::NotFound(format!("Coach {id}")))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
