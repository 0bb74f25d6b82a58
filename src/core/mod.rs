pub mod binder;
pub mod provisioning;
pub mod routing;
pub mod topics;

pub use crate::domain::model::{
    ConsumerConfig, ConsumerGroupBinding, DispatchTarget, DlqPolicy, RouteEntry, RoutingTable,
    SerdeError,
};
pub use crate::domain::ports::{DispatchRegistry, TopicProvisioner};
pub use crate::utils::error::Result;
