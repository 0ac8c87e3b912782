pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod nonce;
pub mod search;
pub mod settings;
pub mod shortcode;
pub mod store;
pub mod utils;

pub use error::{Result, SearchError};
