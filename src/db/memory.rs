//! In-process `Repository` for tests. Mirrors the Postgres schema's rules:
//! foreign keys must exist, weddings.email is unique and deletes cascade.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use time::OffsetDateTime;

use super::models::*;
use super::Repository;

struct StoredMedia {
    kind: MediaKind,
    id: String,
    url: String,
    duration: Option<String>,
    guest_id: String,
    wedding_id: String,
    created_at: OffsetDateTime,
}

struct StoredMessage {
    id: String,
    content: String,
    guest_id: String,
    wedding_id: String,
    created_at: OffsetDateTime,
}

#[derive(Default)]
struct Tables {
    weddings: Vec<Wedding>,
    guests: Vec<Guest>,
    media: Vec<StoredMedia>,
    messages: Vec<StoredMessage>,
}

impl Tables {
    fn guest(&self, id: &str) -> anyhow::Result<Guest> {
        self.guests
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("foreign key violation: guest {id}"))
    }

    fn check_parents(&self, guest_id: &str, wedding_id: &str) -> anyhow::Result<()> {
        self.guest(guest_id)?;
        if !self.weddings.iter().any(|w| w.id == wedding_id) {
            bail!("foreign key violation: wedding {wedding_id}");
        }
        Ok(())
    }

    fn media_memory(&self, m: &StoredMedia) -> anyhow::Result<MediaMemory> {
        Ok(MediaMemory {
            id: m.id.clone(),
            url: m.url.clone(),
            duration: m.duration.clone(),
            guest_id: m.guest_id.clone(),
            wedding_id: m.wedding_id.clone(),
            created_at: m.created_at,
            guest: self.guest(&m.guest_id)?,
        })
    }

    fn message_memory(&self, m: &StoredMessage) -> anyhow::Result<MessageMemory> {
        Ok(MessageMemory {
            id: m.id.clone(),
            content: m.content.clone(),
            guest_id: m.guest_id.clone(),
            wedding_id: m.wedding_id.clone(),
            created_at: m.created_at,
            guest: self.guest(&m.guest_id)?,
        })
    }

    /// Remove memories matching `owned`, returning their blob references.
    fn cascade_memories<F>(&mut self, owned: F) -> Vec<String>
    where
        F: Fn(&str, &str) -> bool,
    {
        let (gone, kept): (Vec<_>, Vec<_>) = self
            .media
            .drain(..)
            .partition(|m| owned(&m.guest_id, &m.wedding_id));
        self.media = kept;
        self.messages.retain(|m| !owned(&m.guest_id, &m.wedding_id));
        gone.into_iter().map(|m| m.url).collect()
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    fail_memory_inserts: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following media/message insert fail like a dropped
    /// connection would.
    pub fn fail_memory_inserts(&self, fail: bool) {
        self.fail_memory_inserts.store(fail, Ordering::SeqCst);
    }

    /// Raw insert that skips service validation, for seeding legacy rows.
    pub fn seed_wedding(&self, wedding: Wedding) {
        self.lock().weddings.push(wedding);
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        let t = self.lock();
        (t.guests.len(), t.media.len(), t.messages.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failure(&self) -> anyhow::Result<()> {
        if self.fail_memory_inserts.load(Ordering::SeqCst) {
            bail!("connection reset by peer");
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert_wedding(&self, new: NewWedding) -> anyhow::Result<Wedding> {
        let mut t = self.lock();
        if t.weddings.iter().any(|w| w.email == new.email) {
            bail!("unique violation: weddings.email");
        }
        let wedding = Wedding {
            id: new.id,
            groom_name: new.groom_name,
            bride_name: new.bride_name,
            date: new.date,
            location: new.location,
            banner_image: new.banner_image,
            description: new.description,
            password: new.password,
            email: new.email,
            pin: new.pin,
            created_at: OffsetDateTime::now_utc(),
        };
        t.weddings.push(wedding.clone());
        Ok(wedding)
    }

    async fn list_weddings(&self) -> anyhow::Result<Vec<Wedding>> {
        Ok(self.lock().weddings.clone())
    }

    async fn find_wedding(&self, id: &str) -> anyhow::Result<Option<Wedding>> {
        Ok(self.lock().weddings.iter().find(|w| w.id == id).cloned())
    }

    async fn find_wedding_by_email(&self, email: &str) -> anyhow::Result<Option<Wedding>> {
        Ok(self.lock().weddings.iter().find(|w| w.email == email).cloned())
    }

    async fn update_wedding(
        &self,
        id: &str,
        changes: WeddingChanges,
    ) -> anyhow::Result<Option<Wedding>> {
        let mut t = self.lock();
        if let Some(email) = &changes.email {
            if t.weddings.iter().any(|w| w.id != id && &w.email == email) {
                bail!("unique violation: weddings.email");
            }
        }
        let Some(w) = t.weddings.iter_mut().find(|w| w.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.groom_name {
            w.groom_name = v;
        }
        if let Some(v) = changes.bride_name {
            w.bride_name = v;
        }
        if let Some(v) = changes.date {
            w.date = v;
        }
        if let Some(v) = changes.location {
            w.location = v;
        }
        if let Some(v) = changes.banner_image {
            w.banner_image = v;
        }
        if let Some(v) = changes.description {
            w.description = v;
        }
        if let Some(v) = changes.password {
            w.password = v;
        }
        if let Some(v) = changes.email {
            w.email = v;
        }
        if let Some(v) = changes.pin {
            w.pin = v;
        }
        Ok(Some(w.clone()))
    }

    async fn delete_wedding(&self, id: &str) -> anyhow::Result<Option<Vec<String>>> {
        let mut t = self.lock();
        let before = t.weddings.len();
        t.weddings.retain(|w| w.id != id);
        if t.weddings.len() == before {
            return Ok(None);
        }
        let (gone, kept): (Vec<_>, Vec<_>) =
            t.guests.drain(..).partition(|g| g.wedding_id == id);
        t.guests = kept;
        let refs = t.cascade_memories(|guest_id, wedding_id| {
            wedding_id == id || gone.iter().any(|g| g.id == guest_id)
        });
        Ok(Some(refs))
    }

    async fn insert_guest(&self, new: NewGuest) -> anyhow::Result<Guest> {
        let mut t = self.lock();
        if !t.weddings.iter().any(|w| w.id == new.wedding_id) {
            bail!("foreign key violation: wedding {}", new.wedding_id);
        }
        let guest = Guest {
            id: new.id,
            name: new.name,
            wedding_id: new.wedding_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.guests.push(guest.clone());
        Ok(guest)
    }

    async fn find_guest(&self, id: &str) -> anyhow::Result<Option<Guest>> {
        Ok(self.lock().guests.iter().find(|g| g.id == id).cloned())
    }

    async fn list_guests(&self, wedding_id: &str) -> anyhow::Result<Vec<Guest>> {
        Ok(self
            .lock()
            .guests
            .iter()
            .filter(|g| g.wedding_id == wedding_id)
            .cloned()
            .collect())
    }

    async fn delete_guest(&self, id: &str) -> anyhow::Result<Option<Vec<String>>> {
        let mut t = self.lock();
        let before = t.guests.len();
        t.guests.retain(|g| g.id != id);
        if t.guests.len() == before {
            return Ok(None);
        }
        Ok(Some(t.cascade_memories(|guest_id, _| guest_id == id)))
    }

    async fn insert_media(&self, new: NewMedia) -> anyhow::Result<MediaMemory> {
        self.check_failure()?;
        let mut t = self.lock();
        t.check_parents(&new.guest_id, &new.wedding_id)?;
        let stored = StoredMedia {
            kind: new.kind,
            id: new.id,
            url: new.url,
            duration: new.duration,
            guest_id: new.guest_id,
            wedding_id: new.wedding_id,
            created_at: OffsetDateTime::now_utc(),
        };
        let memory = t.media_memory(&stored)?;
        t.media.push(stored);
        Ok(memory)
    }

    async fn insert_message(&self, new: NewMessage) -> anyhow::Result<MessageMemory> {
        self.check_failure()?;
        let mut t = self.lock();
        t.check_parents(&new.guest_id, &new.wedding_id)?;
        let stored = StoredMessage {
            id: new.id,
            content: new.content,
            guest_id: new.guest_id,
            wedding_id: new.wedding_id,
            created_at: OffsetDateTime::now_utc(),
        };
        let memory = t.message_memory(&stored)?;
        t.messages.push(stored);
        Ok(memory)
    }

    async fn list_media(
        &self,
        kind: MediaKind,
        wedding_id: &str,
    ) -> anyhow::Result<Vec<MediaMemory>> {
        let t = self.lock();
        t.media
            .iter()
            .filter(|m| m.kind == kind && m.wedding_id == wedding_id)
            .map(|m| t.media_memory(m))
            .collect()
    }

    async fn list_messages(&self, wedding_id: &str) -> anyhow::Result<Vec<MessageMemory>> {
        let t = self.lock();
        t.messages
            .iter()
            .filter(|m| m.wedding_id == wedding_id)
            .map(|m| t.message_memory(m))
            .collect()
    }
}
