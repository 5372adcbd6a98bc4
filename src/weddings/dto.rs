use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateWeddingRequest {
    pub groom_name: String,
    pub bride_name: String,
    pub date: String,
    pub location: String,
    pub banner_image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub pin: Option<String>,
}

/// PATCH-style body: omitted fields stay as they are.
///
/// `description` and `pin` keep explicit `null` apart from omission: a null
/// description clears it, a null pin is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWeddingRequest {
    #[serde(default)]
    pub groom_name: Option<String>,
    #[serde(default)]
    pub bride_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub pin: Option<Option<String>>,
}

/// Only called when the key is present, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct PasswordVerification {
    pub wedding_id: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PinVerification {
    pub wedding_id: String,
    #[serde(default)]
    pub pin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_null_from_missing() {
        let req: UpdateWeddingRequest =
            serde_json::from_str(r#"{"location": "Beach"}"#).unwrap();
        assert_eq!(req.location.as_deref(), Some("Beach"));
        assert!(req.description.is_none());
        assert!(req.pin.is_none());

        let req: UpdateWeddingRequest =
            serde_json::from_str(r#"{"description": null, "pin": null}"#).unwrap();
        assert_eq!(req.description, Some(None));
        assert_eq!(req.pin, Some(None));
    }

    #[test]
    fn create_tolerates_missing_pin() {
        let req: CreateWeddingRequest = serde_json::from_str(
            r#"{"groom_name":"Joao","bride_name":"Maria","date":"2024-06-01",
                "location":"Lisbon","banner_image":"b.jpg","password":"pw",
                "email":"a@b.pt"}"#,
        )
        .unwrap();
        assert!(req.pin.is_none());
        assert!(req.description.is_none());
    }
}
