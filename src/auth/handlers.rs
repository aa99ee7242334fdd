use axum::{extract::State, Form, Json};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{LoginForm, LoginResponse, PublicUser, RegisterForm},
    password::{hash_password, verify_password},
    repo::{Role, User},
};
use crate::error::{ApiError, ApiMessage};
use crate::session::{removal_cookie, session_cookie, SessionData};
use crate::state::AppState;
use crate::validation::{is_valid_email, Validator};

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<ApiMessage>, ApiError> {
    let mut v = Validator::new();
    let first_name = v.required("first_name", &form.first_name, "Le prénom est requis.");
    let last_name = v.required("last_name", &form.last_name, "Le nom est requis.");
    let email = v.email("email", &form.email);
    // The password is not trimmed: leading or trailing spaces are part of it.
    if form.password.is_empty() {
        v.insert_error("password", "Le mot de passe est requis.");
    } else if form.password.chars().count() < 8 {
        v.insert_error(
            "password",
            "Le mot de passe doit contenir au moins 8 caractères.",
        );
    }
    v.finish()?;

    let full_name = format!("{first_name} {last_name}");
    let hash = hash_password(&form.password).map_err(|e| {
        ApiError::internal("Une erreur interne est survenue lors de l'inscription.", e)
    })?;

    // Registration never grants admin; the role is forced to `user`.
    let user = User::insert(&state.db, &full_name, &email, &hash, Role::User)
        .await
        .map_err(|e| {
            ApiError::database("Une erreur interne est survenue lors de l'inscription.", e)
        })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Json(ApiMessage::new(
        "Inscription réussie. Vous pouvez maintenant vous connecter.",
    )))
}

#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let email = form.email.trim().to_string();
    if email.is_empty() || !is_valid_email(&email) {
        return Err(ApiError::Unprocessable(
            "Veuillez fournir une adresse email valide.".into(),
        ));
    }
    if form.password.is_empty() {
        return Err(ApiError::Unprocessable("Le mot de passe est requis.".into()));
    }

    let internal =
        |e: sqlx::Error| ApiError::database("Une erreur interne est survenue lors de la connexion.", e);

    // One message for both failure modes, so accounts cannot be enumerated.
    let Some(user) = User::find_by_email(&state.db, &email).await.map_err(internal)? else {
        warn!(email = %email, "login with unknown email");
        return Err(ApiError::Unauthorized("Identifiants incorrects.".into()));
    };

    let ok = verify_password(&form.password, &user.password_hash).map_err(|e| {
        ApiError::internal("Une erreur interne est survenue lors de la connexion.", e)
    })?;
    if !ok {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::Unauthorized("Identifiants incorrects.".into()));
    }

    // Fixation defense: whatever token the client presented is discarded
    // and a brand-new session is issued.
    if let Some(old) = jar.get(&state.config.session.cookie_name) {
        if let Err(e) = state.sessions.destroy(old.value()).await {
            warn!(error = %e, "could not discard the previous session");
        }
    }

    let data = SessionData {
        user_id: user.id,
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        role: user.role,
    };
    let token = state.sessions.create(&data).await.map_err(|e| {
        ApiError::internal("Une erreur interne est survenue lors de la connexion.", e)
    })?;
    let jar = jar.add(session_cookie(&state.config.session.cookie_name, token));

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Connexion réussie.".into(),
            user: PublicUser {
                id: user.id,
                full_name: user.full_name,
                email: user.email,
                role: user.role,
            },
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiMessage>), ApiError> {
    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        state.sessions.destroy(cookie.value()).await.map_err(|e| {
            ApiError::internal("Une erreur interne est survenue lors de la déconnexion.", e)
        })?;
    }
    let jar = jar.remove(removal_cookie(&state.config.session.cookie_name));
    Ok((jar, Json(ApiMessage::new("Déconnexion réussie."))))
}
