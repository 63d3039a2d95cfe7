//! Property tests for patient access scoping.
//!
//! Invariant: a caller can view a patient exactly when it is an admin or
//! its owning entity is the clinic that referred the patient.

use models::{Patient, PatientDraft, Role};
use proptest::prelude::*;
use security::{authorize_patient, can_view_patient, patient_scope, AccessError, Identity};

fn clinic_id() -> impl Strategy<Value = String> {
    prop_oneof![Just("NH001".to_string()), Just("NH002".to_string()), "[A-Z]{2}[0-9]{3}"]
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::NursingHome), Just(Role::Admin)]
}

fn patient_of(clinic: &str) -> Patient {
    PatientDraft {
        name: Some("Pat".into()),
        age: Some("70".into()),
        gender: Some("M".into()),
        contact_number: Some("555".into()),
        address: Some("1 Road".into()),
        medical_history: Some("copd".into()),
        assigned_hospital_id: Some("H001".into()),
        clinic_id: None,
    }
    .into_patient(Some(clinic))
    .unwrap()
}

proptest! {
    #[test]
    fn view_iff_admin_or_owner(role in role(), entity in clinic_id(), owner in clinic_id()) {
        let identity = Identity {
            account_id: "acc".into(),
            username: "someone".into(),
            role,
            entity_id: entity.clone(),
            display_name: None,
        };
        let patient = patient_of(&owner);
        let expected = role == Role::Admin || entity == patient.referred_by;

        prop_assert_eq!(can_view_patient(&identity, &patient), expected);
        prop_assert_eq!(patient_scope(&identity).admits(&patient.referred_by), expected);
        match authorize_patient(&identity, &patient) {
            Ok(()) => prop_assert!(expected),
            Err(e) => {
                prop_assert!(!expected);
                prop_assert_eq!(e, AccessError::Forbidden);
            }
        }
    }
}
