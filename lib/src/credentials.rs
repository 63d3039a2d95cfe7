// lib/src/credentials.rs
//
// Argon2 is CPU bound; both calls run on the blocking pool.

use tokio::task;

use crate::errors::CareResult;

pub async fn hash_password(password: &str) -> CareResult<String> {
    let password = password.to_string();
    let hash = task::spawn_blocking(move || security::hash_password(&password)).await??;
    Ok(hash)
}

pub async fn verify_password(password: &str, hashed_password: &str) -> CareResult<bool> {
    let password = password.to_string();
    let hashed_password = hashed_password.to_string();
    let matches =
        task::spawn_blocking(move || security::verify_password(&password, &hashed_password)).await??;
    Ok(matches)
}
