use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use tracing::{info, instrument};

use crate::admin::parse_id;
use crate::appointments::repo::{Appointment, AppointmentWithUser};
use crate::datetime::{normalize_admin_datetime, parse_sql_datetime};
use crate::error::{ApiError, ApiMessage};
use crate::session::AdminSession;
use crate::state::AppState;
use crate::validation::is_valid_email;

#[derive(Debug, Deserialize)]
pub struct AppointmentActionForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<AppointmentWithUser>,
}

/// Checked fields shared by create and update.
#[derive(Debug)]
struct AppointmentFields {
    name: String,
    email: String,
    phone: String,
    appointment_date: PrimitiveDateTime,
    message: String,
}

fn check_fields(form: &AppointmentActionForm) -> Result<AppointmentFields, ApiError> {
    let name = form.name.trim();
    let email = form.email.trim();
    let phone = form.phone.trim();
    let date = form.appointment_date.trim();

    if name.is_empty() || email.is_empty() || phone.is_empty() || date.is_empty() {
        return Err(ApiError::Unprocessable(
            "Nom, email, téléphone et date sont requis.".into(),
        ));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Unprocessable("Email invalide.".into()));
    }

    let normalized = normalize_admin_datetime(date);
    let Some(appointment_date) = parse_sql_datetime(&normalized) else {
        return Err(ApiError::Unprocessable(
            "Format de date/heure invalide (attendu: YYYY-MM-DD HH:MM).".into(),
        ));
    };

    Ok(AppointmentFields {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        appointment_date,
        message: form.message.trim().to_string(),
    })
}

#[instrument(skip(state))]
pub async fn list(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let appointments = Appointment::list_with_user(&state.db).await.map_err(|e| {
        ApiError::database(
            "Erreur serveur lors de la récupération des rendez-vous.",
            e,
        )
    })?;
    Ok(Json(AppointmentsResponse {
        success: true,
        appointments,
    }))
}

#[instrument(skip(_session, state, form), fields(action = %form.action))]
pub async fn mutate(
    _session: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<AppointmentActionForm>,
) -> Result<Json<ApiMessage>, ApiError> {
    match form.action.as_str() {
        "create" => {
            let f = check_fields(&form)?;
            Appointment::insert_admin(
                &state.db,
                &f.name,
                &f.email,
                &f.phone,
                f.appointment_date,
                &f.message,
            )
            .await
            .map_err(|e| {
                ApiError::database("Erreur serveur lors de la création du rendez-vous.", e)
            })?;
            info!(email = %f.email, "admin created appointment");
            Ok(Json(ApiMessage::new("Rendez-vous créé avec succès.")))
        }
        "update" => {
            let Some(id) = parse_id(form.id.as_deref()) else {
                return Err(ApiError::Unprocessable("ID de rendez-vous invalide.".into()));
            };
            let f = check_fields(&form)?;
            Appointment::update(
                &state.db,
                id,
                &f.name,
                &f.email,
                &f.phone,
                f.appointment_date,
                &f.message,
            )
            .await
            .map_err(|e| {
                ApiError::database("Erreur serveur lors de la mise à jour du rendez-vous.", e)
            })?;
            info!(appointment_id = id, "admin updated appointment");
            Ok(Json(ApiMessage::new("Rendez-vous mis à jour avec succès.")))
        }
        "delete" => {
            let Some(id) = parse_id(form.id.as_deref()) else {
                return Err(ApiError::Unprocessable("ID de rendez-vous invalide.".into()));
            };
            Appointment::delete(&state.db, id).await.map_err(|e| {
                ApiError::database("Erreur serveur lors de la suppression du rendez-vous.", e)
            })?;
            info!(appointment_id = id, "admin deleted appointment");
            Ok(Json(ApiMessage::new("Rendez-vous supprimé avec succès.")))
        }
        _ => Err(ApiError::BadRequest("Action invalide.".into())),
    }
}
