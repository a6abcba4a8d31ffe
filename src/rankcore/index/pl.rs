use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::rankcore::DocId;
use crate::rankcore::error::{StoreError, StoreResult};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PostingEntry {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

/// Postings of one term. Entry order carries no meaning,
/// but every document appears at most once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostingList {
    entries: Vec<PostingEntry>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList { entries: vec![] }
    }

    // merges repeated documents by summing their term frequencies
    pub fn from_pairs<I>(pairs: I) -> StoreResult<Self>
        where I: IntoIterator<Item = (DocId, u32)> {
        let mut seen: HashMap<DocId, usize> = HashMap::new();
        let mut entries: Vec<PostingEntry> = vec![];
        for (doc_id, term_frequency) in pairs {
            match seen.get(&doc_id) {
                Some(&slot) => {
                    let entry = &mut entries[slot];
                    entry.term_frequency = entry.term_frequency.checked_add(term_frequency)
                        .ok_or_else(|| StoreError::Decode(
                            format!("term frequency overflow for document {}", doc_id)))?;
                }
                None => {
                    seen.insert(doc_id, entries.len());
                    entries.push(PostingEntry { doc_id, term_frequency });
                }
            }
        }
        Ok(PostingList { entries })
    }

    pub fn entries(&self) -> &[PostingEntry] {
        &self.entries
    }

    pub fn document_frequency(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Value encoding of a posting list inside the key-value index.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PostingEncoding {
    /// `doc_id[:tf]` entries joined by commas; a bare id has tf 1
    Delimited,
    /// bincode of `Vec<(i64, u32)>`
    Bincode,
}

impl PostingEncoding {
    pub fn decode(&self, raw: &[u8]) -> StoreResult<PostingList> {
        match self {
            PostingEncoding::Delimited => decode_delimited(raw),
            PostingEncoding::Bincode => {
                let pairs: Vec<(DocId, u32)> = bincode::deserialize(raw)?;
                PostingList::from_pairs(pairs)
            }
        }
    }

    pub fn encode(&self, list: &PostingList) -> Vec<u8> {
        match self {
            PostingEncoding::Delimited => list.entries.iter()
                .map(|e| format!("{}:{}", e.doc_id, e.term_frequency))
                .collect::<Vec<_>>()
                .join(",")
                .into_bytes(),
            PostingEncoding::Bincode => {
                let pairs: Vec<(DocId, u32)> = list.entries.iter()
                    .map(|e| (e.doc_id, e.term_frequency))
                    .collect();
                // serializing plain integer tuples into a Vec cannot fail
                bincode::serialize(&pairs).unwrap_or_default()
            }
        }
    }
}

fn decode_delimited(raw: &[u8]) -> StoreResult<PostingList> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    let mut pairs = vec![];
    for entry in text.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        pairs.push(parse_entry(entry)?);
    }
    PostingList::from_pairs(pairs)
}

fn parse_entry(entry: &str) -> StoreResult<(DocId, u32)> {
    let bad = || StoreError::Decode(format!("bad posting entry '{}'", entry));
    match entry.split_once(':') {
        Some((id, tf)) => {
            let doc_id = id.trim().parse::<DocId>().map_err(|_| bad())?;
            let tf = tf.trim().parse::<u32>().map_err(|_| bad())?;
            Ok((doc_id, tf))
        }
        None => Ok((entry.parse::<DocId>().map_err(|_| bad())?, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &PostingList) -> Vec<(DocId, u32)> {
        list.entries().iter().map(|e| (e.doc_id, e.term_frequency)).collect()
    }

    #[test]
    fn test_decode_bare_ids() {
        let list = PostingEncoding::Delimited.decode(b"1,2").unwrap();
        assert_eq!(pairs(&list), vec![(1, 1), (2, 1)]);
        assert_eq!(list.document_frequency(), 2);
    }

    #[test]
    fn test_decode_with_term_frequency() {
        let list = PostingEncoding::Delimited.decode(b"1:3, 2:1 ,7").unwrap();
        assert_eq!(pairs(&list), vec![(1, 3), (2, 1), (7, 1)]);
    }

    #[test]
    fn test_decode_skips_empty_entries() {
        let list = PostingEncoding::Delimited.decode(b",4,,5,").unwrap();
        assert_eq!(pairs(&list), vec![(4, 1), (5, 1)]);
        assert!(PostingEncoding::Delimited.decode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_decode_merges_duplicate_documents() {
        let list = PostingEncoding::Delimited.decode(b"3:2,4,3:1").unwrap();
        assert_eq!(pairs(&list), vec![(3, 3), (4, 1)]);
        assert_eq!(list.document_frequency(), 2);
    }

    #[test]
    fn test_decode_rejects_frequency_overflow() {
        match PostingEncoding::Delimited.decode(b"1:4294967295,1:1") {
            Err(StoreError::Decode(_)) => (),
            other => panic!("expected decode error, got {:?}", other),
        }
        let list = PostingEncoding::Delimited.decode(b"1:4294967294,1:1").unwrap();
        assert_eq!(pairs(&list), vec![(1, u32::MAX)]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for raw in [&b"1,x"[..], b"1:two", b"1:2:3", b"-"] {
            match PostingEncoding::Delimited.decode(raw) {
                Err(StoreError::Decode(_)) => (),
                other => panic!("expected decode error for {:?}, got {:?}", raw, other),
            }
        }
        assert!(PostingEncoding::Delimited.decode(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_bincode_encoding() {
        let list = PostingList::from_pairs(vec![(10, 2), (11, 5)]).unwrap();
        let raw = PostingEncoding::Bincode.encode(&list);
        assert_eq!(PostingEncoding::Bincode.decode(&raw).unwrap(), list);
        assert!(PostingEncoding::Bincode.decode(&[1, 2, 3]).is_err());
    }
}
