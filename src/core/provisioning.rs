use crate::core::topics::derived_dlq_name;
use crate::core::{ConsumerConfig, DlqPolicy};
use crate::domain::ports::{ConsumerDestinationProperties, ProvisionedDestination, TopicProvisioner};
use crate::utils::error::{BinderError, Result};

/// Normalizes the consumer settings for one input topic. `policy` must already be effective.
pub fn destination_properties(
    topic: &str,
    group: &str,
    policy: &DlqPolicy,
    consumer_config: &ConsumerConfig,
) -> ConsumerDestinationProperties {
    let dlq_name = policy.dlq_enabled.then(|| {
        policy
            .shared_dlq_name()
            .map(str::to_string)
            .unwrap_or_else(|| derived_dlq_name(topic, group))
    });

    ConsumerDestinationProperties {
        enable_dlq: policy.dlq_enabled,
        dlq_name,
        dlq_partitions: consumer_config.dlq_partitions,
        properties: consumer_config.properties.clone(),
    }
}

/// Call-through to a [`TopicProvisioner`] that shapes the binding's consumer
/// settings into [`ConsumerDestinationProperties`].
pub struct DestinationProvisioner<P: TopicProvisioner> {
    provisioner: P,
}

impl<P: TopicProvisioner> DestinationProvisioner<P> {
    pub fn new(provisioner: P) -> Self {
        Self { provisioner }
    }

    pub fn inner(&self) -> &P {
        &self.provisioner
    }

    pub async fn provision(
        &self,
        topic: &str,
        group: &str,
        properties: &ConsumerDestinationProperties,
    ) -> Result<ProvisionedDestination> {
        if topic.is_empty() {
            return Err(BinderError::provisioning(topic, group, "topic name is empty"));
        }

        let destination = self
            .provisioner
            .provision_consumer_destination(topic, group, properties)
            .await?;

        if destination.created {
            tracing::info!("🆕 Created topic '{}' for group '{}'", destination.name, group);
        } else {
            tracing::debug!("Topic '{}' already provisioned", destination.name);
        }

        Ok(destination)
    }
}
