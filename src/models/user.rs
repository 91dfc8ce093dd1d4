use serde::{Deserialize, Serialize};

/// Emails under this domain register as doctors
pub const DOCTOR_EMAIL_SUFFIX: &str = "@hospital.gmail.com";

pub const DOCTORS_COLLECTION: &str = "doctors";
pub const PATIENTS_COLLECTION: &str = "users";

/// Raw registration form. Every field is optional so absence can be told apart
/// from an empty value; an empty string still counts as provided.
#[derive(Debug, Default, Clone, utoipa::ToSchema)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Decoded `key=value` pairs in submission order
pub type FormPairs = Vec<(String, String)>;

impl RegisterForm {
    /// Builds the form from decoded pairs. The first value of a repeated key wins
    /// and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> RegisterForm
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = RegisterForm::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "username" => &mut form.username,
                "email" => &mut form.email,
                "password" => &mut form.password,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }

    /// Fills fields absent from `self` with the ones present in `fallback`
    pub fn or(self, fallback: RegisterForm) -> RegisterForm {
        RegisterForm {
            username: self.username.or(fallback.username),
            email: self.email.or(fallback.email),
            password: self.password.or(fallback.password),
        }
    }

    /// Returns `(username, email, password)` when all three were submitted
    pub fn into_parts(self) -> Option<(String, String, String)> {
        Some((self.username?, self.email?, self.password?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Doctor,
    Patient,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Doctor => "doctor",
            UserType::Patient => "patient",
        }
    }
}

/// Where a registrant goes and what they are recorded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub user_type: UserType,
}

impl Classification {
    pub fn collection(&self) -> &'static str {
        match self.user_type {
            UserType::Doctor => DOCTORS_COLLECTION,
            UserType::Patient => PATIENTS_COLLECTION,
        }
    }
}

/// Case-sensitive suffix check on the email as submitted.
/// Both the collection and the `userType` field are derived from this result.
pub fn classify(email: &str) -> Classification {
    let user_type = if email.ends_with(DOCTOR_EMAIL_SUFFIX) {
        UserType::Doctor
    } else {
        UserType::Patient
    };

    Classification { user_type }
}

/// Document stored in `doctors` or `users`.
/// The password is kept in plaintext exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

impl UserRecord {
    pub fn new(username: String, email: String, password: String, classification: Classification) -> Self {
        Self {
            username,
            email,
            password,
            user_type: classification.user_type,
        }
    }
}
