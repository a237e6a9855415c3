pub(crate) mod health;
pub mod ocr;

pub use health::health_check;
