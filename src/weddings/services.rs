use tracing::{info, instrument, warn};

use super::dto::{CreateWeddingRequest, UpdateWeddingRequest};
use super::validate::{normalize_stored_pin, require_non_blank, validate_email, validate_pin};
use crate::db::{NewWedding, Wedding, WeddingChanges};
use crate::error::{AppError, AppResult};
use crate::ids::new_id;
use crate::state::AppState;
use crate::storage;

/// Every wedding handed out goes through here so the pin is canonical.
fn present(mut wedding: Wedding) -> Wedding {
    wedding.pin = normalize_stored_pin(&wedding.pin);
    wedding
}

async fn ensure_email_free(st: &AppState, email: &str, except_id: Option<&str>) -> AppResult<()> {
    if let Some(other) = st.repo.find_wedding_by_email(email).await? {
        if Some(other.id.as_str()) != except_id {
            warn!(%email, "email already registered");
            return Err(AppError::Conflict("Email already registered".into()));
        }
    }
    Ok(())
}

#[instrument(skip(st, req), fields(email = %req.email))]
pub async fn create_wedding(st: &AppState, req: CreateWeddingRequest) -> AppResult<Wedding> {
    let pin = validate_pin(req.pin.as_deref(), "PIN is required")?;
    require_non_blank(&req.password, "Password is required")?;
    let email = validate_email(&req.email)?;
    ensure_email_free(st, &email, None).await?;

    let wedding = st
        .repo
        .insert_wedding(NewWedding {
            id: new_id(),
            groom_name: req.groom_name,
            bride_name: req.bride_name,
            date: req.date,
            location: req.location,
            banner_image: req.banner_image,
            description: req.description,
            password: req.password,
            email,
            pin,
        })
        .await?;

    info!(wedding_id = %wedding.id, "wedding created");
    Ok(present(wedding))
}

pub async fn list_weddings(st: &AppState) -> AppResult<Vec<Wedding>> {
    let weddings = st.repo.list_weddings().await?;
    Ok(weddings.into_iter().map(present).collect())
}

pub async fn get_wedding(st: &AppState, id: &str) -> AppResult<Wedding> {
    st.repo
        .find_wedding(id)
        .await?
        .map(present)
        .ok_or_else(|| AppError::not_found("Wedding not found"))
}

#[instrument(skip(st, req))]
pub async fn update_wedding(
    st: &AppState,
    id: &str,
    req: UpdateWeddingRequest,
) -> AppResult<Wedding> {
    if st.repo.find_wedding(id).await?.is_none() {
        return Err(AppError::not_found("Wedding not found"));
    }

    let pin = match req.pin {
        Some(raw) => Some(validate_pin(raw.as_deref(), "PIN cannot be empty")?),
        None => None,
    };
    if let Some(password) = &req.password {
        require_non_blank(password, "Password cannot be empty")?;
    }
    let email = match req.email {
        Some(raw) => {
            let email = validate_email(&raw)?;
            ensure_email_free(st, &email, Some(id)).await?;
            Some(email)
        }
        None => None,
    };

    let changes = WeddingChanges {
        groom_name: req.groom_name,
        bride_name: req.bride_name,
        date: req.date,
        location: req.location,
        banner_image: req.banner_image,
        description: req.description,
        password: req.password,
        email,
        pin,
    };

    let wedding = st
        .repo
        .update_wedding(id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("Wedding not found"))?;

    info!(wedding_id = %wedding.id, "wedding updated");
    Ok(present(wedding))
}

/// Remove a wedding with its guests and memories, then their blobs.
#[instrument(skip(st))]
pub async fn delete_wedding(st: &AppState, id: &str) -> AppResult<()> {
    let blobs = st
        .repo
        .delete_wedding(id)
        .await?
        .ok_or_else(|| AppError::not_found("Wedding not found"))?;

    info!(wedding_id = %id, blobs = blobs.len(), "wedding deleted");
    storage::discard(st.storage.as_ref(), &blobs).await;
    Ok(())
}
