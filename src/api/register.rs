use actix_web::{http::header, web, HttpRequest, HttpResponse};
use crate::{
    config::AppConfig,
    database::UserStore,
    models::{FormPairs, RegisterForm},
    services::registration_service,
    utils::AppError,
};

pub const MISSING_PARAMETERS_BODY: &str = "Missing parameters!";
pub const STORE_FAILURE_BODY: &str = "Error saving to database";

/// Query value appended to the login path, already URL-encoded
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration%20successful!%20Please%20login.";

pub fn login_redirect(login_path: &str) -> String {
    format!("{}?message={}", login_path, REGISTRATION_SUCCESS_MESSAGE)
}

fn plain_text(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

/// Body fields win; anything missing from the body is looked up in the query string.
/// Pairs are decoded one by one so a repeated or badly encoded key never hides the others.
fn extract_form(req: &HttpRequest, body: Option<web::Form<FormPairs>>) -> RegisterForm {
    let body = body
        .map(|form| RegisterForm::from_pairs(form.into_inner()))
        .unwrap_or_default();
    let query = web::Query::<FormPairs>::from_query(req.query_string())
        .map(|query| RegisterForm::from_pairs(query.into_inner()))
        .unwrap_or_default();

    body.or(query)
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Registration",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Registered; redirects to the login page with a success message"),
        (status = 200, description = "`Missing parameters!` or `Error saving to database`", body = String, content_type = "text/plain")
    )
)]
pub async fn register(
    req: HttpRequest,
    store: web::Data<dyn UserStore>,
    config: web::Data<AppConfig>,
    form: Option<web::Form<FormPairs>>,
) -> HttpResponse {
    let form = extract_form(&req, form);
    let email_str = form.email.as_deref().unwrap_or("N/A").to_string();
    log::info!("📝 POST /register - email: {}", email_str);

    match registration_service::register(store.get_ref(), form).await {
        Ok(registered) => {
            log::info!(
                "✅ Registration successful: {} as {} (collection: {}, id: {})",
                email_str,
                registered.classification.user_type.as_str(),
                registered.classification.collection(),
                registered.id
            );
            HttpResponse::Found()
                .append_header((header::LOCATION, login_redirect(&config.login_path)))
                .finish()
        }
        Err(AppError::MissingParameters) => {
            log::warn!("⚠️  Registration rejected: missing parameters (email: {})", email_str);
            plain_text(MISSING_PARAMETERS_BODY)
        }
        Err(e) => {
            log::error!("❌ Registration failed: {} - {}", email_str, e);
            plain_text(STORE_FAILURE_BODY)
        }
    }
}
