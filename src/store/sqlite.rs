use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use log::debug;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, params};

use crate::domain::now_epoch;
use crate::domain::page::{ContentKind, Header, Page, PageBody};
use crate::store::repo::PageRegistry;

pub struct SqlitePageRegistry {
    conn: Mutex<Connection>,
}

impl SqlitePageRegistry {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("opening page registry at {}", path.display());
        let conn = Connection::open(path)?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.migrate()?;
        Ok(repo)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.lock().unwrap().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS page (
                id                TEXT PRIMARY KEY,
                message_timestamp INTEGER NOT NULL,
                sender            TEXT NOT NULL,
                subject           TEXT NOT NULL,
                content_type      TEXT NOT NULL,
                headers           BLOB NOT NULL,
                body              BLOB NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Pages with a timestamp strictly greater than `oldest_ts`, newest
    /// first. `recent_pages` is a thin wrapper over this.
    pub fn pages_newer_than(&self, oldest_ts: i64) -> Result<Vec<Page>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, message_timestamp, sender, subject, content_type, headers, body
            FROM page
            WHERE message_timestamp > ?1
            ORDER BY message_timestamp DESC
            "#,
        )?;

        let mut rows = stmt.query(params![oldest_ts])?;
        let mut out = Vec::new();

        while let Some(r) = rows.next()? {
            let kind = ContentKind::from_label(&r.get::<_, String>(4)?);
            let headers: Vec<Header> = serde_json::from_slice(&r.get::<_, Vec<u8>>(5)?)?;
            let body = match r.get_ref(6)? {
                ValueRef::Blob(b) => PageBody::Binary(b.to_vec()),
                other => PageBody::Text(other.as_str()?.to_string()),
            };
            out.push(Page {
                id: r.get(0)?,
                timestamp: r.get(1)?,
                sender: r.get(2)?,
                subject: r.get(3)?,
                kind,
                headers,
                body,
            });
        }
        Ok(out)
    }
}

impl PageRegistry for SqlitePageRegistry {
    fn save_page(&self, page: &Page) -> Result<()> {
        debug!("saving page {} ({})", page.id, page.subject);

        let headers = serde_json::to_vec(&page.headers)?;
        let body = match &page.body {
            PageBody::Text(s) => Value::Text(s.clone()),
            PageBody::Binary(b) => Value::Blob(b.clone()),
        };

        let changed = self.conn.lock().unwrap().execute(
            r#"
            INSERT OR IGNORE INTO page
                (id, message_timestamp, sender, subject, content_type, headers, body)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                page.id,
                page.timestamp,
                page.sender,
                page.subject,
                page.kind.as_str(),
                headers,
                body
            ],
        )?;
        if changed == 0 {
            debug!("page {} already stored, keeping the existing copy", page.id);
        }
        Ok(())
    }

    fn recent_pages(&self, window: Duration) -> Result<Vec<Page>> {
        let oldest_ts = now_epoch() - window.as_secs() as i64;
        debug!("selecting pages newer than {}", oldest_ts);
        self.pages_newer_than(oldest_ts)
    }
}
