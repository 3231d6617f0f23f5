/// Vector-space building blocks for content similarity
///
/// `tfidf` turns feature text into vectors, `sparse` holds them and
/// `similarity` compares them.
pub mod similarity;
pub mod sparse;
pub mod tfidf;

pub use similarity::{cosine_similarities, cosine_similarity};
pub use sparse::SparseVector;
pub use tfidf::{TfidfVectorizer, VectorizerError};
