use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{AppRole, PublicUser, User, SUPER_ADMIN_ID};
use crate::permissions::require_screen;
use crate::registry::{find_by_id_mut, Registry};
use crate::state::AppState;
use crate::storage;
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::Deserialize;

/// Partial user update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<AppRole>,
    pub is_approved: Option<bool>,
    pub password: Option<String>,
    pub profile_photo: Option<String>,
    pub nid_photo: Option<String>,
}

/// Applies an update to one user. The distinguished super-admin account
/// keeps its role no matter what the update says; every other field still
/// applies.
pub fn update_user_internal(
    registry: &mut Registry,
    user_id: &str,
    updates: UserUpdate,
) -> DoelResult<PublicUser> {
    let user = find_by_id_mut(&mut registry.users, user_id)
        .ok_or_else(|| DoelError::NotFound(format!("User {user_id}")))?;

    if let Some(username) = updates.username {
        user.username = username;
    }
    if let Some(email) = updates.email {
        user.email = email;
    }
    if let Some(role) = updates.role {
        if user.id == SUPER_ADMIN_ID && role != AppRole::SuperAdmin {
            tracing::warn!("Ignored role change for the super admin account");
        } else {
            user.role = role;
        }
    }
    if let Some(is_approved) = updates.is_approved {
        user.is_approved = is_approved;
    }
    if let Some(password) = updates.password {
        user.password_hash = Some(bcrypt::hash(password, bcrypt::DEFAULT_COST)?);
    }
    if let Some(profile_photo) = updates.profile_photo {
        user.profile_photo = Some(profile_photo);
    }
    if let Some(nid_photo) = updates.nid_photo {
        user.nid_photo = Some(nid_photo);
    }

    Ok(PublicUser::from(&*user))
}

pub async fn get_all_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<PublicUser>>> {
    require_screen(claims.role, "userManagement")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.users.iter().map(PublicUser::from).collect()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
    Json(updates): Json<UserUpdate>,
) -> DoelResult<Json<PublicUser>> {
    require_screen(claims.role, "userManagement")?;
    let public = {
        let mut registry = state
            .registry
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        update_user_internal(&mut registry, &user_id, updates)?
    };
    refresh_session_mirror(&state, &public);
    Ok(Json(public))
}

/// Keeps the live session and the mirrored current-user key in step when
/// the edited account is the one logged in.
pub fn refresh_session_mirror(state: &AppState, public: &PublicUser) {
    let is_current = state
        .session
        .lock()
        .map(|session| session.user_id.as_deref() == Some(public.id.as_str()))
        .unwrap_or(false);
    if !is_current {
        return;
    }
    if let Ok(mut session) = state.session.lock() {
        session.username = Some(public.username.clone());
        session.role = Some(public.role);
    }
    match serde_json::to_string(public) {
        Ok(raw) => state.store.set(storage::USER_KEY, raw),
        Err(e) => tracing::warn!("Could not mirror current user: {}", e),
    }
}

/// Exposed for settings/profile flows that need the full record.
pub fn find_user<'a>(registry: &'a Registry, user_id: &str) -> DoelResult<&'a User> {
    registry
        .users
        .iter()
        .find(|user| user.id == user_id)
        .ok_or_else(|| DoelError::NotFound(format!("User {user_id}")))
}
