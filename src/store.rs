use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::chunker::{Chunk, Page};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Caller-supplied identifier
    pub id: String,
    /// Where the pages came from (usually a file path)
    pub source: String,
    /// SHA-256 of the page texts, hex encoded
    pub content_hash: String,
    pub page_count: u32,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>, source: impl Into<String>, pages: &[Page]) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            content_hash: content_hash(pages),
            page_count: pages.len() as u32,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub document_count: u32,
    pub chunk_count: u32,
    pub total_tokens: u64,
}

/// Fingerprint of a document's pages
pub fn content_hash(pages: &[Page]) -> String {
    let mut hasher = Sha256::new();
    for page in pages {
        hasher.update(page.page_number.to_le_bytes());
        hasher.update(page.text.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// SQLite persistence for documents and their chunks
pub struct ChunkStore {
    conn: Connection,
}

impl ChunkStore {
    /// Create a new in-memory store
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open (or create) a store file
    pub fn open(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                page_count INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chunks (
                document_id TEXT NOT NULL,
                chunk_order INTEGER NOT NULL,
                start_page INTEGER NOT NULL,
                end_page INTEGER NOT NULL,
                text TEXT NOT NULL,
                token_count INTEGER NOT NULL,
                PRIMARY KEY (document_id, chunk_order),
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(content_hash);
            "#,
            )
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Insert a document record, or update it in place if the id exists.
    /// Stored chunks of an existing document are kept.
    pub fn insert_document(&self, document: &DocumentRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO documents (id, source, content_hash, page_count, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    source = excluded.source,
                    content_hash = excluded.content_hash,
                    page_count = excluded.page_count,
                    created_at = excluded.created_at",
                params![
                    document.id,
                    document.source,
                    document.content_hash,
                    document.page_count,
                    document.created_at
                ],
            )
            .context(format!("Failed to insert document: {}", document.id))?;
        Ok(())
    }

    /// Replace all chunks of a document in one transaction
    pub fn insert_chunks(&mut self, document_id: &str, chunks: &[Chunk]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin transaction")?;

        tx.execute(
            "DELETE FROM chunks WHERE document_id = ?1",
            params![document_id],
        )
        .context(format!("Failed to clear chunks for {}", document_id))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO chunks (document_id, chunk_order, start_page, end_page, text, token_count) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .context("Failed to prepare statement")?;

            for chunk in chunks {
                stmt.execute(params![
                    document_id,
                    chunk.order as i64,
                    chunk.start_page,
                    chunk.end_page,
                    chunk.text,
                    chunk.token_count as i64
                ])
                .context(format!(
                    "Failed to insert chunk {} of {}",
                    chunk.order, document_id
                ))?;
            }
        }

        tx.commit().context("Failed to commit chunks")?;
        info!(document = document_id, chunks = chunks.len(), "stored chunks");
        Ok(())
    }

    /// Get a document record by id
    pub fn get_document(&self, id: &str) -> Result<Option<DocumentRecord>> {
        self.conn
            .query_row(
                "SELECT id, source, content_hash, page_count, created_at FROM documents WHERE id = ?1",
                params![id],
                |row| {
                    Ok(DocumentRecord {
                        id: row.get(0)?,
                        source: row.get(1)?,
                        content_hash: row.get(2)?,
                        page_count: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .context(format!("Failed to query document: {}", id))
    }

    /// Find the stored document for this source with identical content
    pub fn find_matching(&self, source: &str, content_hash: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT id FROM documents WHERE source = ?1 AND content_hash = ?2 ORDER BY created_at LIMIT 1",
                params![source, content_hash],
                |row| row.get(0),
            )
            .optional()
            .context(format!("Failed to query document for {}", source))
    }

    /// All documents, oldest first
    pub fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, source, content_hash, page_count, created_at FROM documents ORDER BY created_at, id",
            )
            .context("Failed to prepare statement")?;

        let documents = stmt
            .query_map([], |row| {
                Ok(DocumentRecord {
                    id: row.get(0)?,
                    source: row.get(1)?,
                    content_hash: row.get(2)?,
                    page_count: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })
            .context("Failed to query documents")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect documents")?;

        Ok(documents)
    }

    /// Chunks of a document in `order`
    pub fn get_chunks(&self, document_id: &str) -> Result<Vec<Chunk>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT chunk_order, start_page, end_page, text, token_count FROM chunks WHERE document_id = ?1 ORDER BY chunk_order",
            )
            .context("Failed to prepare statement")?;

        let chunks = stmt
            .query_map(params![document_id], |row| {
                let order: i64 = row.get(0)?;
                let token_count: i64 = row.get(4)?;
                Ok(Chunk {
                    order: order as usize,
                    start_page: row.get(1)?,
                    end_page: row.get(2)?,
                    text: row.get(3)?,
                    token_count: token_count as usize,
                })
            })
            .context("Failed to query chunks")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect chunks")?;

        Ok(chunks)
    }

    pub fn get_stats(&self) -> Result<StoreStats> {
        let document_count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .context("Failed to count documents")?;

        let (chunk_count, total_tokens): (u32, i64) = self
            .conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(token_count), 0) FROM chunks",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .context("Failed to count chunks")?;

        Ok(StoreStats {
            document_count,
            chunk_count,
            total_tokens: total_tokens as u64,
        })
    }
}
