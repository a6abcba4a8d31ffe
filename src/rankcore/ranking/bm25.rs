use std::collections::HashMap;
use super::Scorer;
use crate::rankcore::DocId;
use crate::rankcore::index::pl::PostingList;
use crate::rankcore::stats::CorpusStats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkapiBm25 {
    // weight saturation factor
    pub k1: f64,
    // level of normalization of document length
    pub b: f64,
}

impl Default for OkapiBm25 {
    fn default() -> Self {
        OkapiBm25 { k1: 1.5, b: 0.75 }
    }
}

impl OkapiBm25 {
    // ln((N - n + 0.5) / (n + 0.5) + 1), negative when n exceeds N
    pub fn idf(total_documents: u64, document_frequency: usize) -> f64 {
        let n_total = total_documents as f64;
        let n = document_frequency as f64;
        ((n_total - n + 0.5) / (n + 0.5) + 1.0).ln()
    }
}

impl Scorer for OkapiBm25 {
    // The BM25 algorithm
    // for all term t sum idf(t) * ftd*(k1+1)/(ftd + k1*(1-b+b*(ld/lavg)))
    //   ftd: frequency of t in document d
    //   ld: length of d, lavg when unknown
    //   lavg: average document length
    fn score(&self,
        postings: &[PostingList],
        stats: &CorpusStats,
        doc_length: &dyn Fn(DocId) -> Option<u32>,
        ) -> HashMap<DocId, f64> {
        let mut scores: HashMap<DocId, f64> = HashMap::new();
        let lavg = stats.average_document_length;
        let k1plus1 = self.k1 + 1.0;
        for list in postings {
            if list.is_empty() {
                continue;
            }
            let idf = Self::idf(stats.total_documents, list.document_frequency());
            for posting in list.entries() {
                let ld = doc_length(posting.doc_id).map(|l| l as f64).unwrap_or(lavg);
                let ftd = posting.term_frequency as f64;
                let denom = ftd + self.k1 * (1.0 - self.b + self.b * ld / lavg);
                *scores.entry(posting.doc_id).or_insert(0.0) += idf * ftd * k1plus1 / denom;
            }
        }
        scores
    }
}
