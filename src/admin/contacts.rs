use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::admin::parse_id;
use crate::contacts::repo::{Contact, ContactWithUser};
use crate::error::{ApiError, ApiMessage};
use crate::session::AdminSession;
use crate::state::AppState;
use crate::validation::is_valid_email;

#[derive(Debug, Deserialize)]
pub struct ContactActionForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub success: bool,
    pub contacts: Vec<ContactWithUser>,
}

fn check_fields(form: &ContactActionForm) -> Result<(String, String, String), ApiError> {
    let name = form.name.trim();
    let email = form.email.trim();
    let message = form.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ApiError::Unprocessable(
            "Nom, email et message sont requis.".into(),
        ));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Unprocessable("Email invalide.".into()));
    }

    Ok((name.to_string(), email.to_string(), message.to_string()))
}

#[instrument(skip(state))]
pub async fn list(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ContactsResponse>, ApiError> {
    let contacts = Contact::list_with_user(&state.db).await.map_err(|e| {
        ApiError::database("Erreur serveur lors de la récupération des messages.", e)
    })?;
    Ok(Json(ContactsResponse {
        success: true,
        contacts,
    }))
}

#[instrument(skip(_session, state, form), fields(action = %form.action))]
pub async fn mutate(
    _session: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<ContactActionForm>,
) -> Result<Json<ApiMessage>, ApiError> {
    match form.action.as_str() {
        "create" => {
            let (name, email, message) = check_fields(&form)?;
            Contact::insert_admin(&state.db, &name, &email, &message)
                .await
                .map_err(|e| {
                    ApiError::database("Erreur serveur lors de la création du message.", e)
                })?;
            info!(%email, "admin created contact message");
            Ok(Json(ApiMessage::new("Message créé avec succès.")))
        }
        "update" => {
            let Some(id) = parse_id(form.id.as_deref()) else {
                return Err(ApiError::Unprocessable("ID de message invalide.".into()));
            };
            let (name, email, message) = check_fields(&form)?;
            Contact::update(&state.db, id, &name, &email, &message)
                .await
                .map_err(|e| {
                    ApiError::database("Erreur serveur lors de la mise à jour du message.", e)
                })?;
            info!(contact_id = id, "admin updated contact message");
            Ok(Json(ApiMessage::new("Message mis à jour avec succès.")))
        }
        "delete" => {
            let Some(id) = parse_id(form.id.as_deref()) else {
                return Err(ApiError::Unprocessable("ID de message invalide.".into()));
            };
            Contact::delete(&state.db, id).await.map_err(|e| {
                ApiError::database("Erreur serveur lors de la suppression du message.", e)
            })?;
            info!(contact_id = id, "admin deleted contact message");
            Ok(Json(ApiMessage::new("Message supprimé avec succès.")))
        }
        _ => Err(ApiError::BadRequest("Action invalide.".into())),
    }
}
