use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Binder-wide handling of records that fail deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SerdeError {
    #[default]
    LogAndFail,
    LogAndContinue,
    SendToDlq,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DlqPolicy {
    pub serde_error: SerdeError,
    pub send_all_serde_errors_to_dlq: bool,
    pub dlq_enabled: bool,
    pub explicit_dlq_name: Option<String>,
}

impl DlqPolicy {
    pub fn new(serde_error: SerdeError, dlq_enabled: bool, explicit_dlq_name: Option<String>) -> Self {
        Self {
            serde_error,
            send_all_serde_errors_to_dlq: serde_error == SerdeError::SendToDlq,
            dlq_enabled,
            explicit_dlq_name,
        }
    }

    /// Applies the `sendToDlq` override. Once on, dead-lettering stays on.
    pub fn effective(&self) -> Self {
        Self {
            dlq_enabled: self.dlq_enabled || self.send_all_serde_errors_to_dlq,
            ..self.clone()
        }
    }

    /// The explicit name, treating an empty string as absent.
    pub fn shared_dlq_name(&self) -> Option<&str> {
        self.explicit_dlq_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// Consumer settings passed through to the provisioner and captured in dispatch targets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumerConfig {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub dlq_partitions: Option<u32>,
    #[serde(default)]
    pub dlq_producer_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerGroupBinding {
    pub topic_spec: String,
    pub group: String,
    pub dlq_policy: DlqPolicy,
    pub consumer_config: ConsumerConfig,
}

impl ConsumerGroupBinding {
    pub fn new(topic_spec: impl Into<String>, group: impl Into<String>, dlq_policy: DlqPolicy) -> Self {
        Self {
            topic_spec: topic_spec.into(),
            group: group.into(),
            dlq_policy,
            consumer_config: ConsumerConfig::default(),
        }
    }

    pub fn with_consumer_config(mut self, consumer_config: ConsumerConfig) -> Self {
        self.consumer_config = consumer_config;
        self
    }
}

/// Where a record that failed deserialization on one input topic is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    pub dlq_name: String,
    pub serde_error: SerdeError,
    pub policy: DlqPolicy,
    pub consumer_config: ConsumerConfig,
}

impl DispatchTarget {
    pub fn new(dlq_name: impl Into<String>, policy: DlqPolicy, consumer_config: ConsumerConfig) -> Self {
        Self {
            dlq_name: dlq_name.into(),
            serde_error: policy.serde_error,
            policy,
            consumer_config,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub topic: String,
    pub dlq_name: String,
}

/// Input topic to dispatch target mapping, in topic-split order.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: Vec<(String, Arc<DispatchTarget>)>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a route. An existing topic keeps its position and takes the new target.
    pub fn insert(&mut self, topic: impl Into<String>, target: Arc<DispatchTarget>) {
        let topic = topic.into();
        match self.routes.iter_mut().find(|(existing, _)| *existing == topic) {
            Some((_, slot)) => *slot = target,
            None => self.routes.push((topic, target)),
        }
    }

    pub fn get(&self, topic: &str) -> Option<&Arc<DispatchTarget>> {
        self.routes
            .iter()
            .find(|(existing, _)| existing == topic)
            .map(|(_, target)| target)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(topic, _)| topic.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<DispatchTarget>)> {
        self.routes.iter().map(|(topic, target)| (topic.as_str(), target))
    }

    pub fn entries(&self) -> Vec<RouteEntry> {
        self.iter()
            .map(|(topic, target)| RouteEntry {
                topic: topic.to_string(),
                dlq_name: target.dlq_name.clone(),
            })
            .collect()
    }
}
