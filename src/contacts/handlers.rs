use axum::{extract::State, Form, Json};
use tracing::{info, instrument};

use crate::contacts::{dto::ContactForm, repo::Contact};
use crate::error::{ApiError, ApiMessage};
use crate::session::MaybeSession;
use crate::state::AppState;
use crate::validation::Validator;

#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: MaybeSession,
    Form(form): Form<ContactForm>,
) -> Result<Json<ApiMessage>, ApiError> {
    let mut v = Validator::new();
    let name = v.required("name", &form.name, "Le nom est requis.");
    let email = v.email("email", &form.email);
    let message = v.required("message", &form.message, "Le message est requis.");
    v.min_len(
        "message",
        &form.message,
        10,
        "Le message doit contenir au moins 10 caractères.",
    );
    v.finish()?;

    let user_id = session.0.map(|s| s.user_id);

    Contact::insert_public(&state.db, user_id, &name, &email, &message)
        .await
        .map_err(|e| {
            ApiError::database(
                "Une erreur interne est survenue lors de l'envoi du message.",
                e,
            )
        })?;

    info!(%email, linked_user = ?user_id, "contact message stored");
    Ok(Json(ApiMessage::new(
        "Votre message a été envoyé avec succès.",
    )))
}
