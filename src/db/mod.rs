use async_trait::async_trait;

#[cfg(test)]
pub mod memory;
pub mod models;
pub mod postgres;
mod rows;

pub use models::*;
pub use postgres::PgRepository;

/// Persistence store for weddings, guests and memories.
///
/// Every call runs in its own connection or transaction; nothing is held
/// across calls. Deletes cascade to dependents and return the blob
/// references of the memories they removed (`None` when the parent row did
/// not exist).
#[async_trait]
pub trait Repository: Send + Sync {
    async fn insert_wedding(&self, new: NewWedding) -> anyhow::Result<Wedding>;
    async fn list_weddings(&self) -> anyhow::Result<Vec<Wedding>>;
    async fn find_wedding(&self, id: &str) -> anyhow::Result<Option<Wedding>>;
    async fn find_wedding_by_email(&self, email: &str) -> anyhow::Result<Option<Wedding>>;
    async fn update_wedding(
        &self,
        id: &str,
        changes: WeddingChanges,
    ) -> anyhow::Result<Option<Wedding>>;
    async fn delete_wedding(&self, id: &str) -> anyhow::Result<Option<Vec<String>>>;

    async fn insert_guest(&self, new: NewGuest) -> anyhow::Result<Guest>;
    async fn find_guest(&self, id: &str) -> anyhow::Result<Option<Guest>>;
    async fn list_guests(&self, wedding_id: &str) -> anyhow::Result<Vec<Guest>>;
    async fn delete_guest(&self, id: &str) -> anyhow::Result<Option<Vec<String>>>;

    /// Insert and read back joined with the authoring guest.
    async fn insert_media(&self, new: NewMedia) -> anyhow::Result<MediaMemory>;
    async fn insert_message(&self, new: NewMessage) -> anyhow::Result<MessageMemory>;

    async fn list_media(&self, kind: MediaKind, wedding_id: &str)
        -> anyhow::Result<Vec<MediaMemory>>;
    async fn list_messages(&self, wedding_id: &str) -> anyhow::Result<Vec<MessageMemory>>;
}
