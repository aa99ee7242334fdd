use axum::{
    extract::{Query, State},
    Form, Json,
};
use tracing::{info, instrument};

use crate::appointments::{
    dto::{AppointmentForm, UserAppointmentsQuery, UserAppointmentsResponse},
    repo::Appointment,
};
use crate::datetime::{compose_appointment_datetime, parse_sql_datetime};
use crate::error::{ApiError, ApiMessage};
use crate::session::MaybeSession;
use crate::state::AppState;
use crate::validation::{is_valid_email, FieldErrors, Validator};

#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: MaybeSession,
    Form(form): Form<AppointmentForm>,
) -> Result<Json<ApiMessage>, ApiError> {
    let mut v = Validator::new();
    let name = v.required("name", &form.name, "Le nom est requis.");
    let email = v.email("email", &form.email);
    let phone = v.required("phone", &form.phone, "Le numéro de téléphone est requis.");
    let date = v.required("date", &form.date, "La date du rendez-vous est requise.");
    v.finish()?;

    let composed = compose_appointment_datetime(&date, form.time.trim());
    let Some(appointment_date) = parse_sql_datetime(&composed) else {
        let mut errors = FieldErrors::default();
        errors.insert("date", "La date/heure du rendez-vous est invalide.");
        return Err(ApiError::validation(errors));
    };

    let message = form.message.trim();
    let message = (!message.is_empty()).then_some(message);

    // Link the booking to the visitor's account when they are logged in.
    let user_id = session.0.map(|s| s.user_id);

    Appointment::insert_public(
        &state.db,
        user_id,
        &name,
        &email,
        &phone,
        appointment_date,
        message,
    )
    .await
    .map_err(|e| {
        ApiError::database(
            "Une erreur interne est survenue lors de l'enregistrement du rendez-vous.",
            e,
        )
    })?;

    info!(%email, date = %composed, linked_user = ?user_id, "appointment booked");
    Ok(Json(ApiMessage::new(
        "Votre demande de rendez-vous a été enregistrée avec succès.",
    )))
}

#[instrument(skip(state))]
pub async fn list_for_email(
    State(state): State<AppState>,
    Query(query): Query<UserAppointmentsQuery>,
) -> Result<Json<UserAppointmentsResponse>, ApiError> {
    let email = query.email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("L'adresse email est requise.".into()));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Unprocessable(
            "L'adresse email n'est pas valide.".into(),
        ));
    }

    let appointments = Appointment::list_by_email(&state.db, email)
        .await
        .map_err(|e| {
            ApiError::database(
                "Une erreur interne est survenue lors de la récupération des rendez-vous.",
                e,
            )
        })?;

    Ok(Json(UserAppointmentsResponse {
        success: true,
        appointments: appointments.into_iter().map(Into::into).collect(),
    }))
}
