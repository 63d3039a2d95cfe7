// models/src/medical/hospital.rs

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::form::{checkbox, required, split_list};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcuBeds {
    pub total: u32,
    pub available: u32,
}

/// A hospital in the directory, as kept in the reference file and mirrored
/// into the hospitals table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub hospital_id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact_number: String,
    pub total_beds: u32,
    pub available_beds: u32,
    #[serde(default)]
    pub icu_beds: IcuBeds,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub ambulance_services: bool,
    #[serde(default)]
    pub mental_health_support: bool,
    #[serde(default)]
    pub financial_assistance: bool,
}

impl Hospital {
    /// Capacity invariants every stored hospital must satisfy.
    pub fn check_capacity(&self) -> ValidationResult<()> {
        if self.available_beds > self.total_beds {
            return Err(ValidationError::AvailableBedsExceedTotal);
        }
        if self.icu_beds.available > self.icu_beds.total {
            return Err(ValidationError::AvailableIcuExceedsTotal);
        }
        if self.specialties.is_empty() {
            return Err(ValidationError::NoSpecialties);
        }
        Ok(())
    }
}

/// Raw add/edit hospital form. Checkbox fields are present only when ticked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HospitalDraft {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact_number: Option<String>,
    pub total_beds: Option<String>,
    pub available_beds: Option<String>,
    pub icu_total: Option<String>,
    pub icu_available: Option<String>,
    pub specialties: Option<String>,
    pub ambulance_services: Option<String>,
    pub mental_health_support: Option<String>,
    pub financial_assistance: Option<String>,
}

fn parse_count(raw: &str, field: &'static str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidBedCount(field))
}

fn to_count(value: i64, field: &'static str) -> ValidationResult<u32> {
    u32::try_from(value).map_err(|_| ValidationError::InvalidBedCount(field))
}

impl HospitalDraft {
    /// Validates the form into a hospital carrying `hospital_id`.
    ///
    /// All required fields are checked for presence before any number is
    /// parsed, so a half-filled form reports the first missing field.
    pub fn into_hospital(self, hospital_id: String) -> ValidationResult<Hospital> {
        let name = required(self.name, "Name")?;
        let location = required(self.location, "Location")?;
        let contact_number = required(self.contact_number, "Contact Number")?;
        let total_beds = required(self.total_beds, "Total Beds")?;
        let available_beds = required(self.available_beds, "Available Beds")?;
        let icu_total = required(self.icu_total, "Icu Total")?;
        let icu_available = required(self.icu_available, "Icu Available")?;
        let specialties = required(self.specialties, "Specialties")?;

        let total_beds = parse_count(&total_beds, "total_beds")?;
        let available_beds = parse_count(&available_beds, "available_beds")?;
        let icu_total = parse_count(&icu_total, "icu_total")?;
        let icu_available = parse_count(&icu_available, "icu_available")?;
        if [total_beds, available_beds, icu_total, icu_available]
            .iter()
            .any(|count| *count < 0)
        {
            return Err(ValidationError::NegativeBedCount);
        }

        let hospital = Hospital {
            hospital_id,
            name,
            location,
            contact_number,
            total_beds: to_count(total_beds, "total_beds")?,
            available_beds: to_count(available_beds, "available_beds")?,
            icu_beds: IcuBeds {
                total: to_count(icu_total, "icu_total")?,
                available: to_count(icu_available, "icu_available")?,
            },
            specialties: split_list(&specialties),
            ambulance_services: checkbox(&self.ambulance_services),
            mental_health_support: checkbox(&self.mental_health_support),
            financial_assistance: checkbox(&self.financial_assistance),
        };
        hospital.check_capacity()?;
        Ok(hospital)
    }
}
