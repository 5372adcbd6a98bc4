use tracing::{info, instrument};

use crate::db::{Guest, NewGuest};
use crate::error::{AppError, AppResult};
use crate::ids::new_id;
use crate::state::AppState;
use crate::storage;
use crate::weddings::validate::require_non_blank;

/// Register a guest. The wedding reference is left to the store's foreign
/// key, so a dangling `wedding_id` surfaces as an internal error.
#[instrument(skip(st))]
pub async fn create_guest(st: &AppState, name: &str, wedding_id: &str) -> AppResult<Guest> {
    require_non_blank(name, "Name is required")?;
    let guest = st
        .repo
        .insert_guest(NewGuest {
            id: new_id(),
            name: name.trim().to_string(),
            wedding_id: wedding_id.to_string(),
        })
        .await?;
    info!(guest_id = %guest.id, "guest created");
    Ok(guest)
}

pub async fn list_guests_for_wedding(st: &AppState, wedding_id: &str) -> AppResult<Vec<Guest>> {
    Ok(st.repo.list_guests(wedding_id).await?)
}

#[instrument(skip(st))]
pub async fn delete_guest(st: &AppState, id: &str) -> AppResult<()> {
    let blobs = st
        .repo
        .delete_guest(id)
        .await?
        .ok_or_else(|| AppError::not_found("Guest not found"))?;
    info!(guest_id = %id, blobs = blobs.len(), "guest deleted");
    storage::discard(st.storage.as_ref(), &blobs).await;
    Ok(())
}
