use crate::domain::model::DispatchTarget;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The consumer settings in the shape a topic provisioner expects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumerDestinationProperties {
    pub enable_dlq: bool,
    /// Dead-letter topic for this input topic, set when `enable_dlq` is on.
    pub dlq_name: Option<String>,
    pub dlq_partitions: Option<u32>,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedDestination {
    pub name: String,
    /// False when the topic already existed.
    pub created: bool,
}

/// Ensures a topic is ready for consumption. Must be idempotent.
#[async_trait]
pub trait TopicProvisioner: Send + Sync {
    async fn provision_consumer_destination(
        &self,
        topic: &str,
        group: &str,
        properties: &ConsumerDestinationProperties,
    ) -> Result<ProvisionedDestination>;
}

/// Runtime sink consulted when a record fails deserialization.
pub trait DispatchRegistry: Send + Sync {
    fn register(&self, topic: &str, target: Arc<DispatchTarget>);
}

#[async_trait]
impl<T: TopicProvisioner + ?Sized> TopicProvisioner for Arc<T> {
    async fn provision_consumer_destination(
        &self,
        topic: &str,
        group: &str,
        properties: &ConsumerDestinationProperties,
    ) -> Result<ProvisionedDestination> {
        (**self)
            .provision_consumer_destination(topic, group, properties)
            .await
    }
}
