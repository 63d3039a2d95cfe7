// lib/src/storage_engine/account_storage.rs

use async_trait::async_trait;
use sled::transaction::ConflictableTransactionError;
use sled::{Db, Transactional, Tree};
use tracing::debug;

use models::{Account, Clinic};
use security::AuthError;

use crate::credentials::verify_password;
use crate::errors::{CareError, CareResult};
use crate::storage_engine::storage_utils::{decode_row, encode_row};

/// Credential and clinic tables.
#[async_trait]
pub trait AccountStorageEngine: Send + Sync + 'static {
    /// Inserts a clinic row and its login account atomically. Fails with
    /// `AlreadyExists` and writes nothing when either key is taken.
    async fn create_clinic_with_account(&self, clinic: &Clinic, account: &Account) -> CareResult<()>;
    /// Removes a clinic row and its account in one transaction.
    async fn remove_clinic_with_account(&self, clinic_id: &str, username: &str) -> CareResult<()>;
    /// Inserts an account. The username must be unused.
    async fn add_account(&self, account: &Account) -> CareResult<()>;
    async fn get_account_by_username(&self, username: &str) -> CareResult<Option<Account>>;
    async fn get_clinic(&self, clinic_id: &str) -> CareResult<Option<Clinic>>;
    async fn list_clinics(&self) -> CareResult<Vec<Clinic>>;
    /// Checks a username/password pair. Unknown users and wrong passwords
    /// both come back as `InvalidCredentials`.
    async fn authenticate(&self, username: &str, password: &str) -> CareResult<Account>;
}

/// Sled-backed implementation of `AccountStorageEngine`, keyed by username
/// and clinic id.
pub struct SledAccountStorage {
    accounts: Tree,
    clinics: Tree,
}

impl SledAccountStorage {
    pub fn new(db: &Db) -> CareResult<Self> {
        Ok(Self {
            accounts: db.open_tree("accounts")?,
            clinics: db.open_tree("clinics")?,
        })
    }
}

#[async_trait]
impl AccountStorageEngine for SledAccountStorage {
    async fn create_clinic_with_account(&self, clinic: &Clinic, account: &Account) -> CareResult<()> {
        let account_bytes = encode_row(account)?;
        let clinic_bytes = encode_row(clinic)?;
        let username = account.username.as_bytes();
        let clinic_id = clinic.clinic_id.as_bytes();

        (&self.accounts, &self.clinics)
            .transaction(|(accounts, clinics)| {
                if accounts.get(username)?.is_some() {
                    return Err(ConflictableTransactionError::Abort(CareError::AlreadyExists(
                        "account".to_string(),
                    )));
                }
                if clinics.get(clinic_id)?.is_some() {
                    return Err(ConflictableTransactionError::Abort(CareError::AlreadyExists(
                        "clinic".to_string(),
                    )));
                }
                accounts.insert(username, account_bytes.as_slice())?;
                clinics.insert(clinic_id, clinic_bytes.as_slice())?;
                Ok(())
            })?;
        debug!("Created clinic {} with account {}", clinic.clinic_id, account.username);
        Ok(())
    }

    async fn remove_clinic_with_account(&self, clinic_id: &str, username: &str) -> CareResult<()> {
        (&self.accounts, &self.clinics)
            .transaction(|(accounts, clinics)| {
                accounts.remove(username.as_bytes())?;
                clinics.remove(clinic_id.as_bytes())?;
                Ok::<(), ConflictableTransactionError<CareError>>(())
            })?;
        Ok(())
    }

    async fn add_account(&self, account: &Account) -> CareResult<()> {
        let bytes = encode_row(account)?;
        self.accounts
            .compare_and_swap(account.username.as_bytes(), None::<&[u8]>, Some(bytes))?
            .map_err(|_| CareError::AlreadyExists(format!("account {}", account.username)))?;
        Ok(())
    }

    async fn get_account_by_username(&self, username: &str) -> CareResult<Option<Account>> {
        self.accounts
            .get(username.as_bytes())?
            .map(|bytes| decode_row(&bytes))
            .transpose()
    }

    async fn get_clinic(&self, clinic_id: &str) -> CareResult<Option<Clinic>> {
        self.clinics
            .get(clinic_id.as_bytes())?
            .map(|bytes| decode_row(&bytes))
            .transpose()
    }

    async fn list_clinics(&self) -> CareResult<Vec<Clinic>> {
        let mut clinics = Vec::new();
        for item in self.clinics.iter() {
            let (_key, value) = item?;
            clinics.push(decode_row(&value)?);
        }
        Ok(clinics)
    }

    async fn authenticate(&self, username: &str, password: &str) -> CareResult<Account> {
        let account = self
            .get_account_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if verify_password(password, &account.password_hash).await? {
            Ok(account)
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
