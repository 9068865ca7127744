// src/services/users.rs

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{hash_password, verify_password},
    config::AdminCredentials,
    error::InfraResult,
    models::{AuthenticatedUser, UserDetails, UserRecord, UserWrite},
    outcome::{Outcome, Rejection},
    store::Store,
};

fn to_write(details: UserDetails) -> InfraResult<UserWrite> {
    Ok(UserWrite {
        password_hash: hash_password(&details.password)?,
        user_name: details.user_name,
        user_email: details.user_email,
        user_description: details.user_description,
    })
}

pub async fn insert_user(store: &dyn Store, details: UserDetails) -> InfraResult<Outcome<UserRecord>> {
    if store.user_name_taken(&details.user_name, None).await? {
        return Ok(Rejection::username_taken().into());
    }

    let record = store.insert_user(&to_write(details)?).await?;
    info!(user_id = %record.user_id, user_name = %record.user_name, "user created");
    Ok(Outcome::Accepted(record))
}

/// Replaces every field, password included. Keeping the current name is
/// not a clash.
pub async fn update_user(
    store: &dyn Store,
    user_id: Uuid,
    details: UserDetails,
) -> InfraResult<Outcome<UserRecord>> {
    if store.user_name_taken(&details.user_name, Some(user_id)).await? {
        return Ok(Rejection::username_taken().into());
    }

    match store.update_user(user_id, &to_write(details)?).await? {
        Some(record) => {
            info!(%user_id, "user updated");
            Ok(Outcome::Accepted(record))
        }
        None => Ok(Rejection::no_such_user().into()),
    }
}

/// Deleting a user removes their appointments too. Returns the record as it
/// was before deletion.
pub async fn delete_user(store: &dyn Store, user_id: Uuid) -> InfraResult<Outcome<UserRecord>> {
    let Some(existing) = store.find_user(user_id).await? else {
        return Ok(Rejection::no_such_user().into());
    };

    store.delete_user(user_id).await?;
    info!(%user_id, "user deleted");
    Ok(Outcome::Accepted(existing))
}

/// Bulk listing, open only to the configured administrator.
pub async fn list_users(
    store: &dyn Store,
    admin: &AdminCredentials,
    user_name: &str,
    password: &str,
) -> InfraResult<Outcome<Vec<UserRecord>>> {
    if user_name != admin.username || !verify_password(password, &admin.password_hash) {
        warn!(user_name, "admin listing refused");
        return Ok(Rejection::invalid_credentials().into());
    }

    Ok(Outcome::Accepted(store.list_users().await?))
}

/// Checks a credential pair. Unknown names and wrong passwords are
/// indistinguishable to the caller.
pub async fn authenticate(
    store: &dyn Store,
    user_name: &str,
    password: &str,
) -> InfraResult<Outcome<AuthenticatedUser>> {
    let Some(creds) = store.find_credentials(user_name).await? else {
        info!(user_name, "login failed: unknown user");
        return Ok(Rejection::invalid_credentials().into());
    };

    if !verify_password(password, &creds.password_hash) {
        info!(user_name, "login failed: bad password");
        return Ok(Rejection::invalid_credentials().into());
    }

    info!(user_id = %creds.user_id, "login ok");
    Ok(Outcome::Accepted(AuthenticatedUser {
        user_id: creds.user_id,
    }))
}
