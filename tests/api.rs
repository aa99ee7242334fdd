//! Router-level tests for the request handling that runs before any
//! database access: validation, the admin guard, action dispatch and the
//! method-not-allowed fallbacks. The state uses a lazily connecting pool,
//! so no Postgres instance is required.

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use bright_smile_api::app::build_app;
use bright_smile_api::auth::Role;
use bright_smile_api::session::{SessionData, SessionStore as _};
use bright_smile_api::state::AppState;

async fn send(state: AppState, request: Request<Body>) -> Response<Body> {
    build_app(state).oneshot(request).await.unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn admin_state_and_cookie() -> (AppState, String) {
    let state = AppState::fake();
    let token = state
        .sessions
        .create(&SessionData {
            user_id: 1,
            full_name: "Jihane Admin".into(),
            email: "jihane@example.com".into(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    (state, format!("bss_session={token}"))
}

#[tokio::test]
async fn health_endpoint_answers() {
    let response = send(AppState::fake(), get("/api/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_reports_all_missing_fields() {
    let response = send(AppState::fake(), form_post("/api/register", "")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Certains champs sont invalides.");
    assert_eq!(body["errors"]["first_name"], "Le prénom est requis.");
    assert_eq!(body["errors"]["last_name"], "Le nom est requis.");
    assert_eq!(body["errors"]["email"], "L'adresse email est requise.");
    assert_eq!(body["errors"]["password"], "Le mot de passe est requis.");
}

#[tokio::test]
async fn register_rejects_bad_email_and_short_password() {
    let response = send(
        AppState::fake(),
        form_post(
            "/api/register",
            "first_name=Jean&last_name=Dupont&email=not-an-email&password=short",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["errors"]["email"], "L'adresse email n'est pas valide.");
    assert_eq!(
        body["errors"]["password"],
        "Le mot de passe doit contenir au moins 8 caractères."
    );
}

#[tokio::test]
async fn login_requires_a_plausible_email() {
    let response = send(
        AppState::fake(),
        form_post("/api/login", "email=nope&password=Passw0rd!"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Veuillez fournir une adresse email valide.");
}

#[tokio::test]
async fn login_requires_a_password() {
    let response = send(
        AppState::fake(),
        form_post("/api/login", "email=jean%40example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Le mot de passe est requis.");
}

#[tokio::test]
async fn logout_succeeds_and_expires_the_cookie() {
    let response = send(AppState::fake(), form_post("/api/logout", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("removal cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("bss_session="));

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Déconnexion réussie.");
}

#[tokio::test]
async fn appointment_rejects_impossible_dates() {
    let response = send(
        AppState::fake(),
        form_post(
            "/api/appointment",
            "name=A&email=a%40b.com&phone=0600000000&date=2025-02-30&time=10%3A00",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(
        body["errors"]["date"],
        "La date/heure du rendez-vous est invalide."
    );
}

#[tokio::test]
async fn appointment_reports_missing_fields_before_date_checks() {
    let response = send(AppState::fake(), form_post("/api/appointment", "")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["errors"]["name"], "Le nom est requis.");
    assert_eq!(body["errors"]["phone"], "Le numéro de téléphone est requis.");
    assert_eq!(
        body["errors"]["date"],
        "La date du rendez-vous est requise."
    );
}

#[tokio::test]
async fn user_appointments_requires_the_email_parameter() {
    let response = send(AppState::fake(), get("/api/user_appointments")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["message"], "L'adresse email est requise.");
}

#[tokio::test]
async fn user_appointments_rejects_malformed_emails() {
    let response = send(AppState::fake(), get("/api/user_appointments?email=zzz")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["message"], "L'adresse email n'est pas valide.");
}

#[tokio::test]
async fn contact_enforces_the_minimum_message_length() {
    let response = send(
        AppState::fake(),
        form_post("/api/contact", "name=A&email=a%40b.com&message=court"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(
        body["errors"]["message"],
        "Le message doit contenir au moins 10 caractères."
    );
}

#[tokio::test]
async fn admin_endpoints_are_guarded() {
    for uri in [
        "/api/admin/users",
        "/api/admin/appointments",
        "/api/admin/contacts",
    ] {
        let response = send(AppState::fake(), get(uri)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "GET {uri}");

        let body = json_body(response).await;
        assert_eq!(body["message"], "Accès refusé. Administrateur requis.");
    }
}

#[tokio::test]
async fn admin_guard_rejects_plain_user_sessions() {
    let state = AppState::fake();
    let token = state
        .sessions
        .create(&SessionData {
            user_id: 2,
            full_name: "Jean Dupont".into(),
            email: "jean@example.com".into(),
            role: Role::User,
        })
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/api/admin/users")
        .header(header::COOKIE, format!("bss_session={token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(state, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_rejects_unknown_actions() {
    let (state, cookie) = admin_state_and_cookie().await;
    let mut request = form_post("/api/admin/users", "action=frobnicate");
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = send(state, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Action invalide.");
}

#[tokio::test]
async fn admin_cannot_delete_their_own_account() {
    let (state, cookie) = admin_state_and_cookie().await;
    let mut request = form_post("/api/admin/users", "action=delete&id=1");
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = send(state, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Vous ne pouvez pas supprimer votre propre compte administrateur."
    );
}

#[tokio::test]
async fn admin_appointment_forms_get_the_admin_date_message() {
    let (state, cookie) = admin_state_and_cookie().await;
    let mut request = form_post(
        "/api/admin/appointments",
        "action=create&name=A&email=a%40b.com&phone=0600000000&appointment_date=2025-02-30+10%3A00",
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = send(state, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Format de date/heure invalide (attendu: YYYY-MM-DD HH:MM)."
    );
}

#[tokio::test]
async fn admin_update_requires_a_valid_id() {
    let (state, cookie) = admin_state_and_cookie().await;
    let mut request = form_post(
        "/api/admin/users",
        "action=update&id=abc&full_name=Jean&email=jean%40example.com",
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = send(state, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["message"], "ID utilisateur invalide.");
}

#[tokio::test]
async fn wrong_methods_get_localized_405s() {
    let response = send(AppState::fake(), get("/api/register")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Méthode HTTP non autorisée. Utilisez POST.");

    let response = send(
        AppState::fake(),
        form_post("/api/user_appointments", "email=a%40b.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Méthode HTTP non autorisée. Utilisez GET.");

    let response = send(
        AppState::fake(),
        Request::builder()
            .method("DELETE")
            .uri("/api/admin/users")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Méthode HTTP non autorisée.");
}
