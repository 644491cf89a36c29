use crate::error::Error;

use tokio::sync::{broadcast, watch};

pub use discovery::DiscoveryState;
pub use lastfm_discover_client::ApiConfig;

pub mod discovery;
pub mod error;
pub mod notification;
pub mod render;
pub mod tags;

#[cfg(test)]
mod test_support;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type StateReceiver = watch::Receiver<DiscoveryState>;
pub type NotificationReceiver = broadcast::Receiver<notification::Notification>;
