// Adapters layer: concrete topic provisioners and the dispatch registry.

pub mod catalog;
pub mod memory;
pub mod registry;

pub use catalog::LocalTopicCatalog;
pub use memory::InMemoryTopicProvisioner;
pub use registry::SendToDlqAndContinue;
