use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateGuestRequest {
    pub name: String,
    pub wedding_id: String,
}
