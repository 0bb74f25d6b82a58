use crate::core::routing::DlqRoutingTableBuilder;
use crate::core::topics::split_topic_spec;
use crate::core::{ConsumerGroupBinding, RouteEntry};
use crate::domain::ports::{DispatchRegistry, TopicProvisioner};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Outcome of preparing one consumer binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingReport {
    pub binding: String,
    pub group: String,
    pub topics: Vec<String>,
    pub dlq_enabled: bool,
    pub routes: Vec<RouteEntry>,
}

pub struct ConsumerBinder<P: TopicProvisioner, R: DispatchRegistry + ?Sized> {
    builder: DlqRoutingTableBuilder<P, R>,
}

impl<P: TopicProvisioner, R: DispatchRegistry + ?Sized> ConsumerBinder<P, R> {
    pub fn new(builder: DlqRoutingTableBuilder<P, R>) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &DlqRoutingTableBuilder<P, R> {
        &self.builder
    }

    pub async fn prepare(&self, name: &str, binding: &ConsumerGroupBinding) -> Result<BindingReport> {
        tracing::info!(
            "🔧 Preparing binding '{}' (destination '{}', group '{}')",
            name,
            binding.topic_spec,
            binding.group
        );

        let table = self.builder.build(binding).await?;
        let dlq_enabled = binding.dlq_policy.effective().dlq_enabled;
        if !dlq_enabled {
            tracing::warn!("⚠️ Dead-letter routing is off for binding '{}'", name);
        }

        tracing::info!("✅ Binding '{}' ready with {} DLQ route(s)", name, table.len());

        Ok(BindingReport {
            binding: name.to_string(),
            group: binding.group.clone(),
            topics: split_topic_spec(&binding.topic_spec),
            dlq_enabled,
            routes: table.entries(),
        })
    }

    /// Prepares bindings in order and stops at the first failure.
    pub async fn prepare_all(&self, bindings: &[(String, ConsumerGroupBinding)]) -> Result<Vec<BindingReport>> {
        let mut reports = Vec::with_capacity(bindings.len());
        for (name, binding) in bindings {
            reports.push(self.prepare(name, binding).await?);
        }
        Ok(reports)
    }
}
