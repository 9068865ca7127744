use tracing::debug;
use uuid::Uuid;

use crate::error::InfraResult;
use crate::outcome::Rejection;
use crate::store::Store;

/// A patient belongs to whichever user booked it first; nobody else may
/// book it afterwards. Ownership is read from existing appointment rows.
pub async fn check_patient_ownership(
    store: &dyn Store,
    p_id: Uuid,
    user_id: Uuid,
) -> InfraResult<Option<Rejection>> {
    if !store.patient_exists(p_id).await? {
        debug!(%p_id, "patient does not exist");
        return Ok(Some(Rejection::unknown_patient()));
    }

    if store.patient_booked_by_other_user(p_id, user_id).await? {
        debug!(%p_id, %user_id, "patient belongs to another user");
        return Ok(Some(Rejection::patient_of_other_user()));
    }

    Ok(None)
}
