use crate::core::provisioning::{destination_properties, DestinationProvisioner};
use crate::core::topics::{derived_dlq_name, split_topic_spec};
use crate::core::{ConsumerGroupBinding, DispatchTarget, RoutingTable};
use crate::domain::ports::{DispatchRegistry, TopicProvisioner};
use crate::utils::error::{BinderError, Result};
use std::sync::Arc;

/// Provisions every input topic of a binding and resolves its dead-letter dispatch target.
pub struct DlqRoutingTableBuilder<P: TopicProvisioner, R: DispatchRegistry + ?Sized> {
    provisioner: DestinationProvisioner<P>,
    registry: Arc<R>,
}

impl<P: TopicProvisioner, R: DispatchRegistry + ?Sized> DlqRoutingTableBuilder<P, R> {
    pub fn new(provisioner: P, registry: Arc<R>) -> Self {
        Self {
            provisioner: DestinationProvisioner::new(provisioner),
            registry,
        }
    }

    pub fn provisioner(&self) -> &P {
        self.provisioner.inner()
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Builds the routing table for one binding.
    ///
    /// All topics are provisioned first, in order, whether or not dead-lettering
    /// is enabled. The first provisioning failure aborts the build. Only then are
    /// dispatch targets registered with the registry.
    ///
    /// With an explicit DLQ name every topic shares a single target; otherwise
    /// each topic gets its own `error.<topic>.<group>` target.
    pub async fn build(&self, binding: &ConsumerGroupBinding) -> Result<RoutingTable> {
        let policy = binding.dlq_policy.effective();

        let topics = split_topic_spec(&binding.topic_spec);
        if topics.is_empty() {
            return Err(BinderError::config(format!(
                "destination '{}' does not name any topic",
                binding.topic_spec
            )));
        }

        for topic in &topics {
            let properties =
                destination_properties(topic, &binding.group, &policy, &binding.consumer_config);
            self.provisioner
                .provision(topic, &binding.group, &properties)
                .await?;
        }

        let mut table = RoutingTable::new();
        if !policy.dlq_enabled {
            tracing::debug!(
                "Dead-letter routing disabled for group '{}', {} topic(s) provisioned",
                binding.group,
                topics.len()
            );
            return Ok(table);
        }

        let shared = policy.shared_dlq_name().map(|name| {
            Arc::new(DispatchTarget::new(
                name,
                policy.clone(),
                binding.consumer_config.clone(),
            ))
        });

        for topic in &topics {
            let target = match &shared {
                Some(target) => Arc::clone(target),
                None => Arc::new(DispatchTarget::new(
                    derived_dlq_name(topic, &binding.group),
                    policy.clone(),
                    binding.consumer_config.clone(),
                )),
            };

            tracing::debug!("🔀 {} -> {}", topic, target.dlq_name);
            self.registry.register(topic, Arc::clone(&target));
            table.insert(topic.as_str(), target);
        }

        Ok(table)
    }
}
