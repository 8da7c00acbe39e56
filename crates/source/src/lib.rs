//! casebrief document sources
//!
//! Local files and the Indian Kanoon API, reduced to plain text

mod extract;
mod kanoon;
mod source;
mod types;

#[cfg(feature = "pdf")]
pub use extract::pdf_to_text;
pub use extract::html_to_text;
pub use kanoon::{KanoonClient, SearchHit};
pub use source::{DocumentSource, FileSource, KanoonSource, KanoonTarget};
pub use types::Document;
