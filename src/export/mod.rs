pub mod writer;

pub use writer::{write_csv, write_json};
