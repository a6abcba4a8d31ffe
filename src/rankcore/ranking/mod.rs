pub mod bm25;

use std::cmp::Ordering;
use std::collections::HashMap;
use crate::rankcore::DocId;
use crate::rankcore::index::pl::PostingList;
use crate::rankcore::stats::CorpusStats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocScore {
    pub docid: DocId,
    pub score: f64,
}

pub trait Scorer {
    // pure: everything the score depends on is passed in
    fn score(&self,
        postings: &[PostingList],
        stats: &CorpusStats,
        doc_length: &dyn Fn(DocId) -> Option<u32>,
        ) -> HashMap<DocId, f64>;
}

// score descending, ties by doc id ascending
fn by_rank(a: &DocScore, b: &DocScore) -> Ordering {
    b.score.total_cmp(&a.score).then(a.docid.cmp(&b.docid))
}

pub fn top_k(scores: HashMap<DocId, f64>, k: usize) -> Vec<DocScore> {
    let mut ranked: Vec<DocScore> = scores.into_iter()
        .map(|(docid, score)| DocScore { docid, score })
        .collect();
    ranked.sort_by(by_rank);
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_order() {
        let scores = HashMap::from([(5, 0.44), (1, 1.86), (2, 1.98), (3, 0.18)]);
        let ranked = top_k(scores, 10);
        let ids: Vec<DocId> = ranked.iter().map(|d| d.docid).collect();
        assert_eq!(ids, vec![2, 1, 5, 3]);
    }

    #[test]
    fn test_top_k_ties_and_truncation() {
        let scores = HashMap::from([(9, 1.0), (4, 1.0), (7, 2.0), (1, 1.0)]);
        let ranked = top_k(scores, 3);
        let ids: Vec<DocId> = ranked.iter().map(|d| d.docid).collect();
        assert_eq!(ids, vec![7, 1, 4]);
        assert!(top_k(HashMap::new(), 3).is_empty());
    }

    #[test]
    fn test_top_k_negative_scores() {
        let scores = HashMap::from([(1, -0.5), (2, 0.0), (3, -2.0)]);
        let ids: Vec<DocId> = top_k(scores, 5).iter().map(|d| d.docid).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
