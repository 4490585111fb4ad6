use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{Staff, StaffStatus};
use crate::permissions::require_screen;
use crate::registry::{self, remove_by_id, replace_by_id, Registry};
use crate::state::AppState;
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInput {
    pub name: String,
    pub role: String,
    pub phone: String,
    pub status: StaffStatus,
    pub salary: i64,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub nid_photo: Option<String>,
    #[serde(default)]
    pub license_photo: Option<String>,
}

fn validate(input: &StaffInput) -> DoelResult<()> {
    if input.name.trim().is_empty() || input.role.trim().is_empty() {
        return Err(DoelError::Validation(
            "Staff name and role are required.".to_string(),
        ));
    }
    Ok(())
}

/// Role text is free-form; driver classification is a substring match.
pub fn is_active_driver(member: &Staff) -> bool {
    member.status == StaffStatus::Active && member.role.to_lowercase().contains("driver")
}

pub fn is_active_guide(member: &Staff) -> bool {
    if member.status != StaffStatus::Active {
        return false;
    }
    let role = member.role.to_lowercase();
    role.contains("conductor") || role.contains("supervisor") || role.contains("guide")
}

pub fn create_staff_internal(registry: &mut Registry, input: StaffInput) -> DoelResult<Staff> {
    validate(&input)?;
    let member = Staff {
        id: registry::time_id("EMP"),
        name: input.name,
        role: input.role,
        phone: input.phone,
        status: input.status,
        salary: input.salary,
        photo: input.photo,
        nid_photo: input.nid_photo,
        license_photo: input.license_photo,
    };
    registry.staff.insert(0, member.clone());
    Ok(member)
}

pub fn update_staff_internal(
    registry: &mut Registry,
    id: &str,
    input: StaffInput,
) -> DoelResult<Staff> {
    validate(&input)?;
    let member = Staff {
        id: id.to_string(),
        name: input.name,
        role: input.role,
        phone: input.phone,
        status: input.status,
        salary: input.salary,
        photo: input.photo,
        nid_photo: input.nid_photo,
        license_photo: input.license_photo,
    };
    if !replace_by_id(&mut registry.staff, id, member.clone()) {
        return Err(DoelError::NotFound(format!("Staff {id}")));
    }
    Ok(member)
}

pub async fn get_staff(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<Staff>>> {
    require_screen(claims.role, "hr")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.staff.clone()))
}

/// Active drivers and guides for the scheduling and sales forms.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewLists {
    pub drivers: Vec<Staff>,
    pub guides: Vec<Staff>,
}

pub async fn get_crew(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<CrewLists>> {
    require_screen(claims.role, "scheduling")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(CrewLists {
        drivers: registry
            .staff
            .iter()
            .filter(|member| is_active_driver(member))
            .cloned()
            .collect(),
        guides: registry
            .staff
            .iter()
            .filter(|member| is_active_guide(member))
            .cloned()
            .collect(),
    }))
}

pub async fn create_staff(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<StaffInput>,
) -> DoelResult<Json<Staff>> {
    require_screen(claims.role, "hr")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let member = create_staff_internal(&mut registry, input)?;
    tracing::info!("Staff {} added as {}", member.name, member.role);
    Ok(Json(member))
}

pub async fn update_staff(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<StaffInput>,
) -> DoelResult<Json<Staff>> {
    require_screen(claims.role, "hr")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let member = update_staff_internal(&mut registry, &id, input)?;
    Ok(Json(member))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "hr")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    remove_by_id(&mut registry.staff, &id)
        .ok_or_else(|| DoelError::NotFound(format!("Staff {id}")))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
