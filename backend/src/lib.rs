pub mod types;
pub mod title_patterns;
pub mod classifier;
pub mod normalize;
pub mod source_ref;
pub mod fuzzy_match;
pub mod grouping;
pub mod attribution;
pub mod corpus;
pub mod analysis;
pub mod settings;
pub mod report;
pub mod logger;

pub use analysis::{analyze_corpus, CorpusAnalysis};
pub use title_patterns::{TitlePatterns, TitleRules};
pub use types::{Classification, ClassifiedRecord, Record, TextType};
