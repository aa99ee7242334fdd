use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::admin::parse_id;
use crate::auth::password::hash_password;
use crate::auth::repo::{Role, User, UserRow};
use crate::error::{ApiError, ApiMessage};
use crate::session::AdminSession;
use crate::state::AppState;
use crate::validation::is_valid_email;

/// Flat action form: `action` selects create/update/delete and decides
/// which of the remaining fields matter.
#[derive(Debug, Deserialize)]
pub struct UserActionForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserRow>,
}

#[instrument(skip(state))]
pub async fn list(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = User::list_all(&state.db).await.map_err(|e| {
        ApiError::database(
            "Erreur serveur lors de la récupération des utilisateurs.",
            e,
        )
    })?;
    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

#[instrument(skip(session, state, form), fields(action = %form.action))]
pub async fn mutate(
    session: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<UserActionForm>,
) -> Result<Json<ApiMessage>, ApiError> {
    match form.action.as_str() {
        "create" => create(&state, &form).await,
        "update" => update(&state, &form).await,
        "delete" => delete(&state, &session, &form).await,
        _ => Err(ApiError::BadRequest("Action invalide.".into())),
    }
}

async fn create(state: &AppState, form: &UserActionForm) -> Result<Json<ApiMessage>, ApiError> {
    let full_name = form.full_name.trim();
    let email = form.email.trim();

    if full_name.is_empty() || email.is_empty() || form.password.is_empty() {
        return Err(ApiError::Unprocessable(
            "Nom, email et mot de passe sont requis.".into(),
        ));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Unprocessable("Email invalide.".into()));
    }
    let role = Role::coerce(&form.role);

    let hash = hash_password(&form.password).map_err(|e| {
        ApiError::internal("Erreur serveur lors de la création de l'utilisateur.", e)
    })?;

    let user = User::insert(&state.db, full_name, email, &hash, role)
        .await
        .map_err(|e| {
            ApiError::database("Erreur serveur lors de la création de l'utilisateur.", e)
        })?;

    info!(user_id = user.id, role = role.as_str(), "admin created user");
    Ok(Json(ApiMessage::new("Utilisateur créé avec succès.")))
}

async fn update(state: &AppState, form: &UserActionForm) -> Result<Json<ApiMessage>, ApiError> {
    let Some(id) = parse_id(form.id.as_deref()) else {
        return Err(ApiError::Unprocessable("ID utilisateur invalide.".into()));
    };

    let full_name = form.full_name.trim();
    let email = form.email.trim();
    if full_name.is_empty() || email.is_empty() {
        return Err(ApiError::Unprocessable("Nom et email sont requis.".into()));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Unprocessable("Email invalide.".into()));
    }
    let role = Role::coerce(&form.role);

    // Moving the email onto another account trips the unique constraint,
    // which surfaces as a 409.
    User::update(&state.db, id, full_name, email, role)
        .await
        .map_err(|e| {
            ApiError::database("Erreur serveur lors de la mise à jour de l'utilisateur.", e)
        })?;

    info!(user_id = id, "admin updated user");
    Ok(Json(ApiMessage::new("Utilisateur mis à jour avec succès.")))
}

async fn delete(
    state: &AppState,
    session: &AdminSession,
    form: &UserActionForm,
) -> Result<Json<ApiMessage>, ApiError> {
    let Some(id) = parse_id(form.id.as_deref()) else {
        return Err(ApiError::Unprocessable("ID utilisateur invalide.".into()));
    };

    if session.0.user_id == id {
        return Err(ApiError::BadRequest(
            "Vous ne pouvez pas supprimer votre propre compte administrateur.".into(),
        ));
    }

    User::delete(&state.db, id).await.map_err(|e| {
        ApiError::database("Erreur serveur lors de la suppression de l'utilisateur.", e)
    })?;

    info!(user_id = id, "admin deleted user");
    Ok(Json(ApiMessage::new("Utilisateur supprimé avec succès.")))
}
