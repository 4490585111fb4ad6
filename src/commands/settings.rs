use crate::commands::users::{find_user, refresh_session_mirror, update_user_internal, UserUpdate};
use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::PublicUser;
use crate::permissions::require_screen;
use crate::state::{AppState, SitePrefs};
use axum::extract::{Json, State};
use axum::Extension;
use serde::Deserialize;

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<SitePrefs>> {
    require_screen(claims.role, "settings")?;
    let prefs = state
        .prefs
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?
        .clone();
    Ok(Json(prefs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingUpdate {
    pub site_name: String,
    pub site_logo: String,
}

pub async fn update_branding(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(update): Json<BrandingUpdate>,
) -> DoelResult<Json<SitePrefs>> {
    require_screen(claims.role, "settings")?;
    if update.site_name.trim().is_empty() {
        return Err(DoelError::Validation("Site name is required.".to_string()));
    }
    let prefs = {
        let mut prefs = state
            .prefs
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        prefs.site_name = update.site_name;
        prefs.site_logo = update.site_logo;
        prefs.clone()
    };
    prefs.mirror(&state.store);
    tracing::info!("Branding updated to '{}'", prefs.site_name);
    Ok(Json(prefs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPrefsUpdate {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

pub async fn update_ui_prefs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(update): Json<UiPrefsUpdate>,
) -> DoelResult<Json<SitePrefs>> {
    require_screen(claims.role, "settings")?;
    if let Some(language) = update.language.as_deref() {
        if language != "en" && language != "bn" {
            return Err(DoelError::Validation(format!(
                "Unsupported language '{language}'"
            )));
        }
    }
    let prefs = {
        let mut prefs = state
            .prefs
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        if let Some(language) = update.language {
            prefs.language = language;
        }
        if let Some(dark_mode) = update.dark_mode {
            prefs.dark_mode = dark_mode;
        }
        prefs.clone()
    };
    prefs.mirror(&state.store);
    Ok(Json(prefs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub nid_photo: Option<String>,
}

/// Profile edits route through the same guarded user update as user
/// management, so the super-admin role pin applies here too.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(update): Json<ProfileUpdate>,
) -> DoelResult<Json<PublicUser>> {
    require_screen(claims.role, "settings")?;
    let user_id = claims
        .user_id
        .clone()
        .ok_or_else(|| DoelError::Auth("No active session.".to_string()))?;

    let public = {
        let mut registry = state
            .registry
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        update_user_internal(
            &mut registry,
            &user_id,
            UserUpdate {
                username: update.username,
                email: update.email,
                profile_photo: update.profile_photo,
                nid_photo: update.nid_photo,
                ..Default::default()
            },
        )?
    };
    refresh_session_mirror(&state, &public);
    Ok(Json(public))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(change): Json<PasswordChange>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "settings")?;
    let user_id = claims
        .user_id
        .clone()
        .ok_or_else(|| DoelError::Auth("No active session.".to_string()))?;
    if change.new_password.len() < 8 {
        return Err(DoelError::Validation(
            "New password must be at least 8 characters.".to_string(),
        ));
    }

    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;

    let current_ok = match &find_user(&registry, &user_id)?.password_hash {
        Some(hash) => bcrypt::verify(&change.current_password, hash).unwrap_or(false),
        None => true,
    };
    if !current_ok {
        return Err(DoelError::Auth(
            "Current password is incorrect.".to_string(),
        ));
    }

    update_user_internal(
        &mut registry,
        &user_id,
        UserUpdate {
            password: Some(change.new_password),
            ..Default::default()
        },
    )?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Super-admin only: every collection back to its seeded state, branding
/// back to defaults.
pub async fn reset_data(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<serde_json::Value>> {
    if !claims.is_super_admin() {
        return Err(DoelError::Forbidden(
            "Only the super admin can reset application data.".to_string(),
        ));
    }
    {
        let mut registry = state
            .registry
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        registry.reset();
    }
    let prefs = {
        let mut prefs = state
            .prefs
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        *prefs = SitePrefs::default();
        prefs.clone()
    };
    prefs.mirror(&state.store);
    tracing::warn!("Application data reset to seed state");
    Ok(Json(serde_json::json!({ "success": true })))
}
