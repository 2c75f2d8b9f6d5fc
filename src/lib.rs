#![warn(unreachable_pub)]
#![warn(dead_code)]

pub mod books;
pub mod cache;
pub mod cli;
pub mod error;
pub mod fetch;
pub mod morph;
pub mod pipeline;
pub mod row;
pub mod select;
pub mod trie;
pub mod types;
pub mod usfm;
pub mod vocab;

// Re-export common types
pub use error::{ArchiveError, BookError, Result, ServiceError, UsfmError};
pub use pipeline::{EnglishFirstPipeline, QuoteServices, StrongsFirstPipeline};
pub use select::{MatchStage, Selection, Selector};
pub use types::{ArticleId, Category, StrongId};
pub use vocab::{StrongsIndex, Vocabulary};
