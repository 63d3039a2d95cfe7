// lib/src/database.rs
//
// `CareDatabase` owns every store and keeps them consistent: reference file
// first, relational/document stores second, with compensation when the
// second step fails.

use std::fs;
use std::sync::Arc;

use serde::Serialize;
use sled::Db;
use tracing::{debug, error, info, warn};

use models::identifiers::{clinic_username, new_hospital_id, validate_entity_id};
use models::{
    Account, AmbulanceRequest, AmbulanceRequestDraft, Clinic, ClinicRegistration,
    CounselingDraft, CounselingResource, Hospital, HospitalDraft, Patient, PatientDraft, Pro,
    ReferenceData, Role, ValidationError,
};
use security::{
    authorize_patient, can_view_ambulance_request, patient_scope, require_role, AuthError,
    Identity, PatientScope,
};

use crate::config::{AdminConfig, StorageConfig};
use crate::credentials::hash_password;
use crate::errors::{CareError, CareResult};
use crate::reference_store::ReferenceStore;
use crate::storage_engine::{
    open_sled_db, AccountStorageEngine, AmbulanceStorageEngine, HospitalTable,
    PatientCollections, SledAccountStorage, SledAmbulanceStorage, SledHospitalTable,
};

const CARE_ROLES: &[Role] = &[Role::NursingHome, Role::Admin];

/// What `bootstrap` had to create.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub clinics_provisioned: usize,
    pub admin_created: bool,
    pub hospitals_migrated: usize,
    pub patients_imported: usize,
}

/// A patient together with the records its detail page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDetails {
    pub patient: Patient,
    pub hospital: Option<Hospital>,
    pub clinic: Option<Clinic>,
}

pub struct CareDatabase {
    db: Db,
    accounts: Arc<dyn AccountStorageEngine>,
    hospitals: Arc<dyn HospitalTable>,
    ambulances: Arc<dyn AmbulanceStorageEngine>,
    patients: PatientCollections,
    reference: ReferenceStore,
}

impl CareDatabase {
    /// Opens the sled database and the reference file under the configured
    /// data directory.
    pub fn open(storage: &StorageConfig) -> CareResult<Self> {
        fs::create_dir_all(&storage.data_directory)?;
        let db = open_sled_db(&storage.sled_path(), storage.cache_capacity)?;
        let reference = ReferenceStore::open(storage.reference_path())?;
        let hospitals = Arc::new(SledHospitalTable::new(&db)?);
        Self::with_parts(db, reference, hospitals)
    }

    /// Builds the coordinator around an already opened database, with a
    /// caller-supplied hospital table.
    pub fn with_parts(
        db: Db,
        reference: ReferenceStore,
        hospitals: Arc<dyn HospitalTable>,
    ) -> CareResult<Self> {
        Ok(CareDatabase {
            accounts: Arc::new(SledAccountStorage::new(&db)?),
            ambulances: Arc::new(SledAmbulanceStorage::new(&db)?),
            patients: PatientCollections::new(db.clone()),
            hospitals,
            reference,
            db,
        })
    }

    pub fn reference(&self) -> &ReferenceStore {
        &self.reference
    }

    pub async fn flush(&self) -> CareResult<()> {
        self.db.flush_async().await?;
        Ok(())
    }

    /// Brings the stores in line with the reference file: clinic rows and
    /// accounts for every seeded clinic, the admin account, the hospitals
    /// table and seeded patients. Safe to run on every start.
    pub async fn bootstrap(&self, admin: &AdminConfig) -> CareResult<BootstrapReport> {
        let seed = self.reference.snapshot().await;
        let mut report = BootstrapReport::default();

        for clinic in &seed.nursing_homes {
            if validate_entity_id(&clinic.clinic_id).is_err() {
                warn!("Skipping seed clinic with invalid id '{}'", clinic.clinic_id);
                continue;
            }
            if self.accounts.get_clinic(&clinic.clinic_id).await?.is_some() {
                continue;
            }
            let password = format!("{}123", clinic.clinic_id);
            let account = Account::new(
                clinic_username(&clinic.clinic_id),
                hash_password(&password).await?,
                Role::NursingHome,
                clinic.clinic_id.clone(),
            );
            match self.accounts.create_clinic_with_account(clinic, &account).await {
                Ok(()) => report.clinics_provisioned += 1,
                Err(CareError::AlreadyExists(what)) => {
                    warn!("Seed clinic {} not provisioned: {} already exists", clinic.clinic_id, what)
                }
                Err(e) => return Err(e),
            }
        }

        match &admin.password {
            Some(password) => {
                if self.accounts.get_account_by_username(&admin.username).await?.is_none() {
                    let account = Account::new(
                        admin.username.clone(),
                        hash_password(password).await?,
                        Role::Admin,
                        admin.username.clone(),
                    );
                    self.accounts.add_account(&account).await?;
                    report.admin_created = true;
                }
            }
            None => warn!("No admin password configured; admin account not provisioned"),
        }

        if self.hospitals.count().await? == 0 {
            for hospital in &seed.hospitals {
                self.hospitals.upsert(hospital).await?;
                report.hospitals_migrated += 1;
            }
        }

        for raw in &seed.patients {
            let patient: Patient = match serde_json::from_value(raw.clone()) {
                Ok(patient) => patient,
                Err(e) => {
                    warn!("Skipping malformed seed patient: {}", e);
                    continue;
                }
            };
            if validate_entity_id(&patient.referred_by).is_err()
                || validate_entity_id(&patient.patient_id).is_err()
            {
                warn!("Skipping seed patient '{}' with invalid ids", patient.patient_id);
                continue;
            }
            if self.patients.get(&patient.referred_by, &patient.patient_id)?.is_none() {
                self.patients.insert(&patient)?;
                report.patients_imported += 1;
            }
        }

        info!(
            "Bootstrap complete: {} clinics provisioned, admin created: {}, {} hospitals migrated, {} patients imported",
            report.clinics_provisioned,
            report.admin_created,
            report.hospitals_migrated,
            report.patients_imported
        );
        Ok(report)
    }

    // --- Accounts ---

    /// Creates a clinic and its login. The relational rows go in first; if
    /// the reference file cannot be updated they are removed again.
    pub async fn register_clinic(&self, registration: ClinicRegistration) -> CareResult<Clinic> {
        let validated = registration.validate()?;
        let clinic = validated.clinic;
        let account = Account::new(
            clinic_username(&clinic.clinic_id),
            hash_password(&validated.password).await?,
            Role::NursingHome,
            clinic.clinic_id.clone(),
        );
        self.accounts.create_clinic_with_account(&clinic, &account).await?;

        let added = clinic.clone();
        if let Err(e) = self
            .reference
            .mutate(move |data| {
                data.nursing_homes.push(added);
                Ok(())
            })
            .await
        {
            if let Err(undo) = self
                .accounts
                .remove_clinic_with_account(&clinic.clinic_id, &account.username)
                .await
            {
                error!("Could not roll back clinic {}: {}", clinic.clinic_id, undo);
            }
            return Err(e);
        }
        info!("Registered clinic {} ({})", clinic.clinic_id, clinic.name);
        Ok(clinic)
    }

    pub async fn login_clinic(&self, clinic_id: &str, password: &str) -> CareResult<Identity> {
        let clinic_id = clinic_id.trim();
        if clinic_id.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials.into());
        }
        let account = self
            .accounts
            .authenticate(&clinic_username(clinic_id), password)
            .await?;
        if account.role != Role::NursingHome {
            return Err(AuthError::InvalidCredentials.into());
        }
        let display_name = self
            .accounts
            .get_clinic(&account.entity_id)
            .await?
            .map(|clinic| clinic.name);
        debug!("Clinic {} logged in", account.entity_id);
        Ok(Identity::from_account(&account, display_name))
    }

    pub async fn login_admin(&self, username: &str, password: &str) -> CareResult<Identity> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials.into());
        }
        let account = self.accounts.authenticate(username, password).await?;
        if account.role != Role::Admin {
            return Err(AuthError::InvalidCredentials.into());
        }
        debug!("Administrator {} logged in", account.username);
        Ok(Identity::from_account(&account, Some(account.username.clone())))
    }

    pub async fn clinics(&self, identity: &Identity) -> CareResult<Vec<Clinic>> {
        require_role(identity, &[Role::Admin])?;
        self.accounts.list_clinics().await
    }

    async fn clinic(&self, clinic_id: &str) -> CareResult<Option<Clinic>> {
        match self.accounts.get_clinic(clinic_id).await? {
            Some(clinic) => Ok(Some(clinic)),
            None => Ok(self.reference.read(|data| data.clinic(clinic_id).cloned()).await),
        }
    }

    // --- Hospitals ---

    pub async fn hospitals(&self) -> Vec<Hospital> {
        self.reference.read(|data| data.hospitals.clone()).await
    }

    pub async fn hospital(&self, hospital_id: &str) -> CareResult<Hospital> {
        self.reference
            .read(|data| data.hospital(hospital_id).cloned())
            .await
            .ok_or_else(|| CareError::NotFound("Hospital not found".to_string()))
    }

    pub async fn hospital_name(&self, hospital_id: Option<&str>) -> String {
        self.reference
            .read(|data| data.hospital_name(hospital_id).to_string())
            .await
    }

    pub async fn add_hospital(&self, identity: &Identity, draft: HospitalDraft) -> CareResult<Hospital> {
        require_role(identity, &[Role::Admin])?;
        let hospital = draft.into_hospital(new_hospital_id())?;

        let added = hospital.clone();
        self.reference
            .mutate(move |data| {
                if data.hospital(&added.hospital_id).is_some() {
                    return Err(CareError::AlreadyExists(format!("hospital {}", added.hospital_id)));
                }
                data.hospitals.push(added);
                Ok(())
            })
            .await?;

        if let Err(e) = self.hospitals.upsert(&hospital).await {
            let id = hospital.hospital_id.clone();
            self.compensate("hospital add", self.reference.mutate(move |data| {
                data.remove_hospital(&id);
                Ok(())
            }))
            .await;
            return Err(e);
        }
        info!("Added hospital {} ({})", hospital.hospital_id, hospital.name);
        Ok(hospital)
    }

    pub async fn update_hospital(
        &self,
        identity: &Identity,
        hospital_id: &str,
        draft: HospitalDraft,
    ) -> CareResult<Hospital> {
        require_role(identity, &[Role::Admin])?;
        validate_entity_id(hospital_id)?;
        let hospital = draft.into_hospital(hospital_id.to_string())?;

        let replacement = hospital.clone();
        let previous = self
            .reference
            .mutate(move |data| {
                let slot = data
                    .hospital_mut(&replacement.hospital_id)
                    .ok_or_else(|| CareError::NotFound("Hospital not found".to_string()))?;
                Ok(std::mem::replace(slot, replacement))
            })
            .await?;

        if let Err(e) = self.hospitals.upsert(&hospital).await {
            self.compensate("hospital update", self.reference.mutate(move |data| {
                if let Some(slot) = data.hospital_mut(&previous.hospital_id) {
                    *slot = previous;
                }
                Ok(())
            }))
            .await;
            return Err(e);
        }
        info!("Updated hospital {}", hospital.hospital_id);
        Ok(hospital)
    }

    pub async fn delete_hospital(&self, identity: &Identity, hospital_id: &str) -> CareResult<Hospital> {
        require_role(identity, &[Role::Admin])?;
        let id = hospital_id.to_string();
        let (index, removed) = self
            .reference
            .mutate(move |data| {
                let index = data
                    .hospitals
                    .iter()
                    .position(|h| h.hospital_id == id)
                    .ok_or_else(|| CareError::NotFound("Hospital not found".to_string()))?;
                Ok((index, data.hospitals.remove(index)))
            })
            .await?;

        if let Err(e) = self.hospitals.delete(hospital_id).await {
            let restored = removed.clone();
            self.compensate("hospital delete", self.reference.mutate(move |data| {
                let at = index.min(data.hospitals.len());
                data.hospitals.insert(at, restored);
                Ok(())
            }))
            .await;
            return Err(e);
        }
        info!("Deleted hospital {}", hospital_id);
        Ok(removed)
    }

    async fn compensate(&self, what: &str, undo: impl std::future::Future<Output = CareResult<()>>) {
        if let Err(e) = undo.await {
            error!("Compensation for {} failed, stores may disagree: {}", what, e);
        } else {
            warn!("Rolled back {} after a store failure", what);
        }
    }

    // --- Patients ---

    pub async fn add_patient(&self, identity: &Identity, draft: PatientDraft) -> CareResult<Patient> {
        require_role(identity, CARE_ROLES)?;
        let owner = match identity.clinic_id() {
            Some(clinic_id) => Some(clinic_id.to_string()),
            None => draft.clinic_id.clone(),
        };
        let patient = draft.into_patient(owner.as_deref())?;

        if let Some(hospital_id) = patient.assigned_hospital_id.as_deref() {
            let known = self.reference.read(|data| data.hospital(hospital_id).is_some()).await;
            if !known {
                return Err(ValidationError::UnknownReference {
                    kind: "hospital",
                    id: hospital_id.to_string(),
                }
                .into());
            }
        }
        if identity.is_admin() && self.clinic(&patient.referred_by).await?.is_none() {
            return Err(ValidationError::UnknownReference {
                kind: "clinic",
                id: patient.referred_by.clone(),
            }
            .into());
        }

        self.patients.insert(&patient)?;
        info!("Patient {} added for clinic {}", patient.patient_id, patient.referred_by);
        Ok(patient)
    }

    /// Fetches a patient the caller may see, looking in the caller's own
    /// collection first. Unknown ids are `NotFound`, an id that only exists
    /// under another clinic is `Forbidden`.
    pub async fn patient_for(&self, identity: &Identity, patient_id: &str) -> CareResult<Patient> {
        let not_found = || CareError::NotFound("Patient not found".to_string());
        validate_entity_id(patient_id).map_err(|_| not_found())?;
        let scope = patient_scope(identity);
        let patient = match self.patients.find(&scope, patient_id)? {
            Some(patient) => patient,
            None if scope == PatientScope::All => return Err(not_found()),
            None => self
                .patients
                .find(&PatientScope::All, patient_id)?
                .ok_or_else(not_found)?,
        };
        if let Err(e) = authorize_patient(identity, &patient) {
            warn!(
                "Account {} denied access to patient {}",
                identity.username, patient_id
            );
            return Err(e.into());
        }
        Ok(patient)
    }

    pub async fn patient_details(&self, identity: &Identity, patient_id: &str) -> CareResult<PatientDetails> {
        let patient = self.patient_for(identity, patient_id).await?;
        let hospital = match patient.assigned_hospital_id.as_deref() {
            Some(id) => self.reference.read(|data| data.hospital(id).cloned()).await,
            None => None,
        };
        let clinic = self.clinic(&patient.referred_by).await?;
        Ok(PatientDetails {
            patient,
            hospital,
            clinic,
        })
    }

    pub async fn patients_for(&self, identity: &Identity) -> CareResult<Vec<Patient>> {
        self.patients.list(&patient_scope(identity))
    }

    /// Files an ambulance request and moves the patient to `In Transit`.
    pub async fn request_ambulance(
        &self,
        identity: &Identity,
        patient_id: &str,
        draft: AmbulanceRequestDraft,
    ) -> CareResult<AmbulanceRequest> {
        require_role(identity, CARE_ROLES)?;
        let mut patient = self.patient_for(identity, patient_id).await?;
        let request = draft.into_request(&patient.patient_id, &patient.referred_by)?;
        self.ambulances.create(&request).await?;

        patient.mark_in_transit();
        if let Err(e) = self.patients.replace(&patient) {
            let request_id = request.request_id.clone();
            self.compensate("ambulance request", self.ambulances.delete(&request_id)).await;
            return Err(e);
        }
        info!(
            "Ambulance request {} filed for patient {}",
            request.request_id, patient.patient_id
        );
        Ok(request)
    }

    /// Assigns a PRO to a patient. The PRO's list never holds the patient
    /// twice; a previous PRO loses the patient.
    pub async fn assign_pro(
        &self,
        identity: &Identity,
        patient_id: &str,
        pro_id: Option<String>,
    ) -> CareResult<Patient> {
        require_role(identity, CARE_ROLES)?;
        let pro_id = models::form::required(pro_id, "PRO ID")?;
        let original = self.patient_for(identity, patient_id).await?;

        let known = self.reference.read(|data| data.pro(&pro_id).is_some()).await;
        if !known {
            return Err(CareError::NotFound("PRO not found".to_string()));
        }

        let mut patient = original.clone();
        patient.assigned_pro_id = Some(pro_id.clone());
        self.patients.replace(&patient)?;

        let previous = original.assigned_pro_id.clone();
        let assigned = patient.patient_id.clone();
        let target = pro_id.clone();
        let result = self
            .reference
            .mutate(move |data| {
                if let Some(prev) = previous.as_deref().filter(|prev| *prev != target) {
                    if let Some(pro) = data.pro_mut(prev) {
                        pro.unassign_patient(&assigned);
                    }
                }
                let pro = data
                    .pro_mut(&target)
                    .ok_or_else(|| CareError::NotFound("PRO not found".to_string()))?;
                pro.assign_patient(&assigned);
                Ok(())
            })
            .await;

        if let Err(e) = result {
            if let Err(undo) = self.patients.replace(&original) {
                error!("Could not revert PRO assignment on patient {}: {}", original.patient_id, undo);
            }
            return Err(e);
        }
        info!("PRO {} assigned to patient {}", pro_id, patient.patient_id);
        Ok(patient)
    }

    // --- Ambulance requests ---

    pub async fn ambulance_requests_for(&self, identity: &Identity) -> CareResult<Vec<AmbulanceRequest>> {
        let requests = self.ambulances.list().await?;
        Ok(requests
            .into_iter()
            .filter(|request| can_view_ambulance_request(identity, request))
            .collect())
    }

    /// Marks a request resolved. Resolving twice leaves the first
    /// resolution time in place.
    pub async fn resolve_ambulance_request(
        &self,
        identity: &Identity,
        request_id: &str,
    ) -> CareResult<AmbulanceRequest> {
        require_role(identity, &[Role::Admin])?;
        let mut request = self
            .ambulances
            .get(request_id)
            .await?
            .ok_or_else(|| CareError::NotFound("Ambulance request not found".to_string()))?;
        if request.resolve() {
            self.ambulances.save(&request).await?;
            info!("Ambulance request {} resolved", request_id);
        }
        Ok(request)
    }

    // --- Reference lists ---

    pub async fn pros(&self) -> Vec<Pro> {
        self.reference.read(|data| data.pros.clone()).await
    }

    pub async fn counseling_resources(&self) -> Vec<CounselingResource> {
        self.reference.read(|data| data.counseling_resources.clone()).await
    }

    pub async fn add_counseling_resource(
        &self,
        identity: &Identity,
        draft: CounselingDraft,
    ) -> CareResult<CounselingResource> {
        require_role(identity, &[Role::Admin])?;
        let resource = draft.into_resource()?;
        let added = resource.clone();
        self.reference
            .mutate(move |data| {
                data.counseling_resources.push(added);
                Ok(())
            })
            .await?;
        Ok(resource)
    }

    pub async fn reference_snapshot(&self) -> ReferenceData {
        self.reference.snapshot().await
    }
}
