// models/src/medical/mod.rs

pub mod account;
pub mod ambulance;
pub mod clinic;
pub mod counseling;
pub mod hospital;
pub mod patient;
pub mod pro;
pub mod role;

pub use account::Account;
pub use ambulance::{AmbulanceRequest, AmbulanceRequestDraft, AmbulanceStatus};
pub use clinic::{Clinic, ClinicRegistration, ValidatedRegistration};
pub use counseling::{CounselingDraft, CounselingResource};
pub use hospital::{Hospital, HospitalDraft, IcuBeds};
pub use patient::{Patient, PatientDraft, PatientStatus};
pub use pro::Pro;
pub use role::Role;
