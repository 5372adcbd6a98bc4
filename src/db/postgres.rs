use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::models::*;
use super::rows::{MediaRow, MessageRow};
use super::Repository;

const WEDDING_COLUMNS: &str = "id, groom_name, bride_name, date, location, banner_image, \
     description, password, email, pin, created_at";

const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.content, m.guest_id, m.wedding_id, m.created_at,
           g.name AS guest_name, g.wedding_id AS guest_wedding_id,
           g.created_at AS guest_created_at
      FROM messages m
      JOIN guests g ON g.id = m.guest_id
"#;

/// Blob references owned by a set of memories, gathered before a cascade.
///
/// A wedding's cascade also reaches memories its guests left on other
/// weddings, through the `guest_id` foreign key.
const BLOB_REFS_BY_WEDDING: &str = r#"
    SELECT url FROM photos
     WHERE wedding_id = $1 OR guest_id IN (SELECT id FROM guests WHERE wedding_id = $1)
    UNION ALL SELECT url FROM videos
     WHERE wedding_id = $1 OR guest_id IN (SELECT id FROM guests WHERE wedding_id = $1)
    UNION ALL SELECT url FROM audios
     WHERE wedding_id = $1 OR guest_id IN (SELECT id FROM guests WHERE wedding_id = $1)
"#;

const BLOB_REFS_BY_GUEST: &str = r#"
    SELECT url FROM photos WHERE guest_id = $1
    UNION ALL SELECT url FROM videos WHERE guest_id = $1
    UNION ALL SELECT url FROM audios WHERE guest_id = $1
"#;

fn media_select(kind: MediaKind) -> String {
    let duration = match kind {
        MediaKind::Audio => "m.duration",
        MediaKind::Photo | MediaKind::Video => "NULL::text",
    };
    format!(
        r#"
    SELECT m.id, m.url, {duration} AS duration, m.guest_id, m.wedding_id, m.created_at,
           g.name AS guest_name, g.wedding_id AS guest_wedding_id,
           g.created_at AS guest_created_at
      FROM {table} m
      JOIN guests g ON g.id = m.guest_id
"#,
        table = kind.table()
    )
}

#[derive(Clone)]
pub struct PgRepository {
    db: PgPool,
}

impl PgRepository {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert_wedding(&self, new: NewWedding) -> anyhow::Result<Wedding> {
        let sql = format!(
            r#"
            INSERT INTO weddings (id, groom_name, bride_name, date, location, banner_image,
                                  description, password, email, pin)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {WEDDING_COLUMNS}
            "#
        );
        let wedding = sqlx::query_as::<_, Wedding>(&sql)
            .bind(&new.id)
            .bind(&new.groom_name)
            .bind(&new.bride_name)
            .bind(&new.date)
            .bind(&new.location)
            .bind(&new.banner_image)
            .bind(&new.description)
            .bind(&new.password)
            .bind(&new.email)
            .bind(&new.pin)
            .fetch_one(&self.db)
            .await
            .context("insert wedding")?;
        Ok(wedding)
    }

    async fn list_weddings(&self) -> anyhow::Result<Vec<Wedding>> {
        let sql = format!("SELECT {WEDDING_COLUMNS} FROM weddings ORDER BY created_at ASC");
        let rows = sqlx::query_as::<_, Wedding>(&sql)
            .fetch_all(&self.db)
            .await
            .context("list weddings")?;
        Ok(rows)
    }

    async fn find_wedding(&self, id: &str) -> anyhow::Result<Option<Wedding>> {
        let sql = format!("SELECT {WEDDING_COLUMNS} FROM weddings WHERE id = $1");
        let row = sqlx::query_as::<_, Wedding>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find wedding")?;
        Ok(row)
    }

    async fn find_wedding_by_email(&self, email: &str) -> anyhow::Result<Option<Wedding>> {
        let sql = format!("SELECT {WEDDING_COLUMNS} FROM weddings WHERE email = $1");
        let row = sqlx::query_as::<_, Wedding>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .context("find wedding by email")?;
        Ok(row)
    }

    async fn update_wedding(
        &self,
        id: &str,
        changes: WeddingChanges,
    ) -> anyhow::Result<Option<Wedding>> {
        let (set_description, description) = match changes.description {
            Some(d) => (true, d),
            None => (false, None),
        };
        let sql = format!(
            r#"
            UPDATE weddings
               SET groom_name   = COALESCE($2, groom_name),
                   bride_name   = COALESCE($3, bride_name),
                   date         = COALESCE($4, date),
                   location     = COALESCE($5, location),
                   banner_image = COALESCE($6, banner_image),
                   description  = CASE WHEN $7 THEN $8 ELSE description END,
                   password     = COALESCE($9, password),
                   email        = COALESCE($10, email),
                   pin          = COALESCE($11, pin)
             WHERE id = $1
            RETURNING {WEDDING_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Wedding>(&sql)
            .bind(id)
            .bind(changes.groom_name)
            .bind(changes.bride_name)
            .bind(changes.date)
            .bind(changes.location)
            .bind(changes.banner_image)
            .bind(set_description)
            .bind(description)
            .bind(changes.password)
            .bind(changes.email)
            .bind(changes.pin)
            .fetch_optional(&self.db)
            .await
            .context("update wedding")?;
        Ok(row)
    }

    async fn delete_wedding(&self, id: &str) -> anyhow::Result<Option<Vec<String>>> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let refs: Vec<String> = sqlx::query_scalar::<_, String>(BLOB_REFS_BY_WEDDING)
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .context("collect wedding blobs")?;

        let deleted = sqlx::query("DELETE FROM weddings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete wedding")?
            .rows_affected();
        if deleted == 0 {
            return Ok(None);
        }

        tx.commit().await.context("commit tx")?;
        Ok(Some(refs))
    }

    async fn insert_guest(&self, new: NewGuest) -> anyhow::Result<Guest> {
        let guest = sqlx::query_as::<_, Guest>(
            r#"
            INSERT INTO guests (id, name, wedding_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, wedding_id, created_at
            "#,
        )
        .bind(&new.id)
        .bind(&new.name)
        .bind(&new.wedding_id)
        .fetch_one(&self.db)
        .await
        .context("insert guest")?;
        Ok(guest)
    }

    async fn find_guest(&self, id: &str) -> anyhow::Result<Option<Guest>> {
        let guest = sqlx::query_as::<_, Guest>(
            "SELECT id, name, wedding_id, created_at FROM guests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find guest")?;
        Ok(guest)
    }

    async fn list_guests(&self, wedding_id: &str) -> anyhow::Result<Vec<Guest>> {
        let rows = sqlx::query_as::<_, Guest>(
            r#"
            SELECT id, name, wedding_id, created_at
              FROM guests
             WHERE wedding_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(wedding_id)
        .fetch_all(&self.db)
        .await
        .context("list guests by wedding")?;
        Ok(rows)
    }

    async fn delete_guest(&self, id: &str) -> anyhow::Result<Option<Vec<String>>> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let refs: Vec<String> = sqlx::query_scalar::<_, String>(BLOB_REFS_BY_GUEST)
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .context("collect guest blobs")?;

        let deleted = sqlx::query("DELETE FROM guests WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete guest")?
            .rows_affected();
        if deleted == 0 {
            return Ok(None);
        }

        tx.commit().await.context("commit tx")?;
        Ok(Some(refs))
    }

    async fn insert_media(&self, new: NewMedia) -> anyhow::Result<MediaMemory> {
        let table = new.kind.table();
        let mut tx = self.db.begin().await.context("begin tx")?;

        let sql = match new.kind {
            MediaKind::Audio => format!(
                "INSERT INTO {table} (id, url, duration, guest_id, wedding_id) \
                 VALUES ($1, $2, $3, $4, $5)"
            ),
            MediaKind::Photo | MediaKind::Video => format!(
                "INSERT INTO {table} (id, url, guest_id, wedding_id) VALUES ($1, $2, $3, $4)"
            ),
        };
        let mut insert = sqlx::query(&sql).bind(&new.id).bind(&new.url);
        if new.kind == MediaKind::Audio {
            insert = insert.bind(&new.duration);
        }
        insert
            .bind(&new.guest_id)
            .bind(&new.wedding_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("insert into {table}"))?;

        let sql = format!("{} WHERE m.id = $1", media_select(new.kind));
        let row = sqlx::query_as::<_, MediaRow>(&sql)
            .bind(&new.id)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("load {table} with guest"))?;

        tx.commit().await.context("commit tx")?;
        Ok(row.into())
    }

    async fn insert_message(&self, new: NewMessage) -> anyhow::Result<MessageMemory> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, content, guest_id, wedding_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&new.id)
        .bind(&new.content)
        .bind(&new.guest_id)
        .bind(&new.wedding_id)
        .execute(&mut *tx)
        .await
        .context("insert message")?;

        let sql = format!("{MESSAGE_SELECT} WHERE m.id = $1");
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(&new.id)
            .fetch_one(&mut *tx)
            .await
            .context("load message with guest")?;

        tx.commit().await.context("commit tx")?;
        Ok(row.into())
    }

    async fn list_media(
        &self,
        kind: MediaKind,
        wedding_id: &str,
    ) -> anyhow::Result<Vec<MediaMemory>> {
        let sql = format!(
            "{} WHERE m.wedding_id = $1 ORDER BY m.created_at ASC",
            media_select(kind)
        );
        let rows = sqlx::query_as::<_, MediaRow>(&sql)
            .bind(wedding_id)
            .fetch_all(&self.db)
            .await
            .with_context(|| format!("list {} by wedding", kind.table()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_messages(&self, wedding_id: &str) -> anyhow::Result<Vec<MessageMemory>> {
        let sql = format!("{MESSAGE_SELECT} WHERE m.wedding_id = $1 ORDER BY m.created_at ASC");
        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(wedding_id)
            .fetch_all(&self.db)
            .await
            .context("list messages by wedding")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
