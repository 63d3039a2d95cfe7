// models/src/medical/clinic.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::form::required;
use crate::identifiers::new_clinic_id;

/// A referring nursing home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub clinic_id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "Utc::now", with = "crate::timestamps::lenient")]
    pub created_at: DateTime<Utc>,
}

/// Raw signup form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicRegistration {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// A signup that passed validation: the clinic row plus the plaintext
/// password that still has to be hashed.
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub clinic: Clinic,
    pub password: String,
}

impl ClinicRegistration {
    pub fn validate(self) -> ValidationResult<ValidatedRegistration> {
        let name = required(self.name, "Name")?;
        let location = required(self.location, "Location")?;
        let contact_person = required(self.contact_person, "Contact person")?;
        let phone = required(self.phone, "Phone")?;
        let email = required(self.email, "Email")?;
        // Passwords are compared untrimmed.
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingField("Password"))?;
        if self.confirm_password.as_deref() != Some(password.as_str()) {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(ValidatedRegistration {
            clinic: Clinic {
                clinic_id: new_clinic_id(),
                name,
                location,
                contact_person,
                phone,
                email,
                created_at: Utc::now(),
            },
            password,
        })
    }
}
