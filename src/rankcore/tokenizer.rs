use super::Term;

// split on whitespace, lower-case every piece
pub fn tokenize(query: &str) -> Vec<Term> {
    query.split_whitespace()
        .map(|token| token.to_lowercase())
        .collect()
}
