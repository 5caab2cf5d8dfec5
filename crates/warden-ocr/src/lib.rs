pub mod engine;
pub mod error;
pub mod extract;

pub use engine::{HttpOcrEngine, OcrEngine};
pub use error::OcrError;
pub use extract::TextExtractor;
