pub mod new_pairs_service;
pub mod highlight_service;
pub mod search_service;
pub mod filter_service;

pub use new_pairs_service::{ Insertion, InsertionSource, NewPairsFeed };
pub use highlight_service::{ ConversionHighlighter, ConversionPolicy, LeadingPrefixPolicy };
pub use search_service::SearchQuery;
pub use filter_service::{ ColumnFilter, ColumnFilters };
