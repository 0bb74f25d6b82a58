pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemoryTopicProvisioner, LocalTopicCatalog, SendToDlqAndContinue};
pub use config::BinderConfig;
pub use crate::core::{binder::ConsumerBinder, routing::DlqRoutingTableBuilder};
pub use utils::error::{BinderError, Result};
