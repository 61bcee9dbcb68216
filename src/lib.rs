pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::{CartActionError, CartError, CartResult, SearchError};
pub use service::{normalize, MatchPipeline, Selector};
