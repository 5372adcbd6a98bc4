//! Shared-secret checks for a wedding: password for hosts, PIN for guests.
//!
//! Both secrets are stored and compared in plaintext. Hashing them would
//! change which legacy values verify, so it is left as a known gap.

use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn password_matches(stored: &str, candidate: &str) -> bool {
    stored.trim() == candidate.trim()
}

/// A missing candidate counts as "". The candidate is not zero-padded.
pub fn pin_matches(stored: &str, candidate: Option<&str>) -> bool {
    stored.trim() == candidate.map(str::trim).unwrap_or_default()
}

#[instrument(skip(st, candidate))]
pub async fn verify_password(st: &AppState, wedding_id: &str, candidate: &str) -> AppResult<bool> {
    let wedding = st
        .repo
        .find_wedding(wedding_id)
        .await?
        .ok_or_else(|| AppError::not_found("Wedding not found"))?;
    let valid = password_matches(&wedding.password, candidate);
    debug!(valid, "password checked");
    Ok(valid)
}

#[instrument(skip(st, candidate))]
pub async fn verify_pin(st: &AppState, wedding_id: &str, candidate: Option<&str>) -> AppResult<bool> {
    let wedding = st
        .repo
        .find_wedding(wedding_id)
        .await?
        .ok_or_else(|| AppError::not_found("Wedding not found"))?;
    let valid = pin_matches(&wedding.pin, candidate);
    debug!(valid, "pin checked");
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Wedding;
    use crate::weddings::services::tests::{create_sample, sample_request};
    use time::OffsetDateTime;

    #[test]
    fn password_comparison_trims_both_sides() {
        assert!(password_matches("secret", " secret "));
        assert!(password_matches(" secret\n", "secret"));
        assert!(!password_matches("secret", "Secret"));
    }

    #[test]
    fn pin_comparison_is_exact_after_trim() {
        assert!(pin_matches("000042", Some(" 000042 ")));
        assert!(!pin_matches("000042", Some("42")));
        assert!(pin_matches("", None));
        assert!(pin_matches("", Some("  ")));
        assert!(!pin_matches("", Some("000000")));
    }

    #[tokio::test]
    async fn verify_password_against_stored_wedding() {
        let app = AppState::fake();
        let mut req = sample_request("pw@example.com");
        req.password = "secret".into();
        let w = create_sample(&app.state, req).await;

        assert!(verify_password(&app.state, &w.id, " secret ").await.unwrap());
        assert_eq!(
            verify_password(&app.state, &w.id, " secret ").await.unwrap(),
            verify_password(&app.state, &w.id, "secret").await.unwrap()
        );
        assert!(!verify_password(&app.state, &w.id, "guess").await.unwrap());
    }

    #[tokio::test]
    async fn verify_pin_uses_normalized_stored_pin() {
        let app = AppState::fake();
        let mut req = sample_request("pin@example.com");
        req.pin = Some("42".into());
        let w = create_sample(&app.state, req).await;

        assert!(verify_pin(&app.state, &w.id, Some("000042")).await.unwrap());
        assert!(!verify_pin(&app.state, &w.id, Some("42")).await.unwrap());
    }

    #[tokio::test]
    async fn wedding_without_pin_only_matches_blank() {
        let app = AppState::fake();
        app.repo.seed_wedding(Wedding {
            id: "legacy".into(),
            groom_name: "A".into(),
            bride_name: "B".into(),
            date: "2020-01-01".into(),
            location: "Porto".into(),
            banner_image: "b.jpg".into(),
            description: None,
            password: "pw".into(),
            email: "legacy@example.com".into(),
            pin: String::new(),
            created_at: OffsetDateTime::now_utc(),
        });

        assert!(verify_pin(&app.state, "legacy", Some("")).await.unwrap());
        assert!(verify_pin(&app.state, "legacy", None).await.unwrap());
        assert!(!verify_pin(&app.state, "legacy", Some("000000")).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_wedding_is_not_found() {
        let app = AppState::fake();
        assert!(matches!(
            verify_password(&app.state, "nope", "x").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            verify_pin(&app.state, "nope", Some("123456")).await,
            Err(AppError::NotFound(_))
        ));
    }
}
