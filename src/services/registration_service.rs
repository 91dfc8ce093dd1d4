// ==================== REGISTRATION ====================
// Validates the form, picks doctors/users by email and writes one document

use crate::{
    database::UserStore,
    models::{classify, Classification, RegisterForm, UserRecord},
    utils::AppError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub id: String,
    pub classification: Classification,
}

/// Inserts exactly one document on success and none on any error.
/// Duplicates are not checked: the same form twice yields two documents.
pub async fn register(store: &dyn UserStore, form: RegisterForm) -> Result<Registered, AppError> {
    let (username, email, password) = form.into_parts().ok_or(AppError::MissingParameters)?;

    let classification = classify(&email);
    let record = UserRecord::new(username, email, password, classification);

    let id = store
        .insert_user(classification.collection(), &record)
        .await?;

    Ok(Registered { id, classification })
}
