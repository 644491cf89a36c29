pub mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod lastfm_models;
pub mod normalize;
pub mod operation;

pub use client::{Client, Envelope};
pub use config::ApiConfig;
pub use error::{Error, ItemError};
pub use operation::Operation;

pub type Result<T, E = Error> = std::result::Result<T, E>;
