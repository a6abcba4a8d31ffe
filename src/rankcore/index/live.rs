use std::path::Path;
use redb::{Database, ReadableTable, TableDefinition, TableError};
use super::PostingStore;
use super::pl::{PostingList, PostingEncoding};
use crate::rankcore::error::{StoreError, StoreResult};

// term -> encoded posting list
pub const POSTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("postings");

/// Posting index backed by a redb file. Only read transactions are
/// ever started; redb serves them concurrently from one handle.
pub struct LiveStore {
    db: Database,
    encoding: PostingEncoding,
}

impl LiveStore {
    pub fn open(path: &Path, encoding: PostingEncoding) -> StoreResult<Self> {
        if !path.is_file() {
            return Err(StoreError::Unavailable(format!("no index file at {}", path.display())));
        }
        let db = Database::open(path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(LiveStore { db, encoding })
    }
}

impl PostingStore for LiveStore {
    fn lookup(&self, term: &str) -> StoreResult<Option<PostingList>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(POSTINGS) {
            Ok(table) => table,
            // an index nobody has written to yet
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(StoreError::Lookup(e.to_string())),
        };
        match table.get(term)? {
            Some(raw) => self.encoding.decode(raw.value()).map(Some),
            None => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "redb"
    }
}
