use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Registration Service API",
        version = "1.0.0",
        description = "Form-based user registration. \n\n**Classification:** emails ending in `@hospital.gmail.com` are stored as doctors in `doctors`; every other email is stored as a patient in `users`.\n\n**Note:** passwords are stored as submitted, without hashing."
    ),
    paths(
        crate::api::register::register,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::RegisterForm,
            crate::models::UserType,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Registration", description = "Doctor and patient sign-up."),
        (name = "Health", description = "Liveness and database connectivity."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/register"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
