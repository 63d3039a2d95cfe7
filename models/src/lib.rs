// models/src/lib.rs

pub mod errors;
pub mod form;
pub mod identifiers;
pub mod medical;
pub mod reference;
pub mod timestamps;

pub use errors::{ValidationError, ValidationResult};
pub use medical::{
    Account, AmbulanceRequest, AmbulanceRequestDraft, AmbulanceStatus, Clinic,
    ClinicRegistration, CounselingDraft, CounselingResource, Hospital, HospitalDraft, IcuBeds,
    Patient, PatientDraft, PatientStatus, Pro, Role, ValidatedRegistration,
};
pub use reference::ReferenceData;
