pub mod format;
pub mod variant;
pub mod card;
pub mod board;

pub use board::{ BoardCard, BoardColumn, BoardSnapshot, ImageFailures };
pub use card::{ CardState, DisplaySettings };
