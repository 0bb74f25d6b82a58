use crate::domain::ports::{ConsumerDestinationProperties, ProvisionedDestination, TopicProvisioner};
use crate::utils::error::{BinderError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicState {
    pub partitions: u32,
    pub groups: BTreeSet<String>,
}

/// Provisioner that keeps topics in memory. Useful for dry runs and tests.
#[derive(Debug)]
pub struct InMemoryTopicProvisioner {
    topics: Mutex<BTreeMap<String, TopicState>>,
    calls: Mutex<Vec<(String, String)>>,
    auto_create_topics: bool,
    default_partitions: u32,
}

impl Default for InMemoryTopicProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTopicProvisioner {
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            auto_create_topics: true,
            default_partitions: 1,
        }
    }

    pub fn with_auto_create_topics(mut self, enabled: bool) -> Self {
        self.auto_create_topics = enabled;
        self
    }

    pub fn with_default_partitions(mut self, partitions: u32) -> Self {
        self.default_partitions = partitions;
        self
    }

    pub fn with_existing_topics<I, S>(self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut known = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
            for topic in topics {
                known.entry(topic.into()).or_insert_with(|| TopicState {
                    partitions: self.default_partitions,
                    groups: BTreeSet::new(),
                });
            }
        }
        self
    }

    pub fn topic(&self, name: &str) -> Option<TopicState> {
        self.topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Every `(topic, group)` this provisioner was asked for, in call order.
    pub fn provisioning_calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TopicProvisioner for InMemoryTopicProvisioner {
    async fn provision_consumer_destination(
        &self,
        topic: &str,
        group: &str,
        properties: &ConsumerDestinationProperties,
    ) -> Result<ProvisionedDestination> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((topic.to_string(), group.to_string()));

        let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
        let created = !topics.contains_key(topic);
        if created && !self.auto_create_topics {
            return Err(BinderError::provisioning(
                topic,
                group,
                "topic does not exist and auto-creation is disabled",
            ));
        }

        let dlq = properties
            .dlq_name
            .as_deref()
            .filter(|_| properties.enable_dlq);
        if let Some(dlq) = dlq {
            if !topics.contains_key(dlq) && !self.auto_create_topics {
                return Err(BinderError::provisioning(
                    topic,
                    group,
                    format!("dead-letter topic '{}' does not exist and auto-creation is disabled", dlq),
                ));
            }
        }

        let state = topics.entry(topic.to_string()).or_insert_with(|| TopicState {
            partitions: self.default_partitions,
            groups: BTreeSet::new(),
        });
        if !group.is_empty() {
            state.groups.insert(group.to_string());
        }

        if let Some(dlq) = dlq {
            let partitions = properties.dlq_partitions.unwrap_or(self.default_partitions);
            topics.entry(dlq.to_string()).or_insert_with(|| {
                tracing::info!("🆕 Created dead-letter topic '{}' ({} partitions)", dlq, partitions);
                TopicState {
                    partitions,
                    groups: BTreeSet::new(),
                }
            });
        }

        Ok(ProvisionedDestination {
            name: topic.to_string(),
            created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_provisioning_is_idempotent() {
        let provisioner = InMemoryTopicProvisioner::new().with_default_partitions(3);
        let props = ConsumerDestinationProperties::default();

        let first = provisioner
            .provision_consumer_destination("orders", "g1", &props)
            .await
            .unwrap();
        let second = provisioner
            .provision_consumer_destination("orders", "g1", &props)
            .await
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(provisioner.topic_names(), vec!["orders"]);

        let state = provisioner.topic("orders").unwrap();
        assert_eq!(state.partitions, 3);
        assert_eq!(state.groups.len(), 1);
        assert_eq!(provisioner.provisioning_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_topic_without_auto_create_fails() {
        let provisioner = InMemoryTopicProvisioner::new()
            .with_auto_create_topics(false)
            .with_existing_topics(["orders"]);
        let props = ConsumerDestinationProperties::default();

        assert!(provisioner
            .provision_consumer_destination("orders", "g1", &props)
            .await
            .is_ok());

        let err = provisioner
            .provision_consumer_destination("payments", "g1", &props)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("auto-creation is disabled"));
        assert!(provisioner.topic("payments").is_none());
    }

    fn dlq_properties(dlq_name: &str, dlq_partitions: Option<u32>) -> ConsumerDestinationProperties {
        ConsumerDestinationProperties {
            enable_dlq: true,
            dlq_name: Some(dlq_name.to_string()),
            dlq_partitions,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dead_letter_topic_is_created_with_dlq_partitions() {
        let provisioner = InMemoryTopicProvisioner::new().with_default_partitions(2);

        provisioner
            .provision_consumer_destination("orders", "g1", &dlq_properties("shared.dlq", Some(7)))
            .await
            .unwrap();
        provisioner
            .provision_consumer_destination("payments", "g1", &dlq_properties("error.payments.g1", None))
            .await
            .unwrap();

        assert_eq!(
            provisioner.topic_names(),
            vec!["error.payments.g1", "orders", "payments", "shared.dlq"]
        );
        assert_eq!(provisioner.topic("shared.dlq").unwrap().partitions, 7);
        assert!(provisioner.topic("shared.dlq").unwrap().groups.is_empty());
        assert_eq!(provisioner.topic("error.payments.g1").unwrap().partitions, 2);
        assert_eq!(provisioner.provisioning_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_dead_letter_topic_skipped_when_dlq_disabled() {
        let provisioner = InMemoryTopicProvisioner::new();
        let mut props = dlq_properties("shared.dlq", Some(7));
        props.enable_dlq = false;

        provisioner
            .provision_consumer_destination("orders", "g1", &props)
            .await
            .unwrap();

        assert_eq!(provisioner.topic_names(), vec!["orders"]);
    }

    #[tokio::test]
    async fn test_missing_dead_letter_topic_without_auto_create_fails() {
        let provisioner = InMemoryTopicProvisioner::new()
            .with_auto_create_topics(false)
            .with_existing_topics(["orders"]);

        let err = provisioner
            .provision_consumer_destination("orders", "g1", &dlq_properties("shared.dlq", None))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("dead-letter topic 'shared.dlq'"));
        assert!(provisioner.topic("shared.dlq").is_none());
    }

    #[tokio::test]
    async fn test_empty_group_is_not_recorded() {
        let provisioner = InMemoryTopicProvisioner::new();
        provisioner
            .provision_consumer_destination("orders", "", &ConsumerDestinationProperties::default())
            .await
            .unwrap();

        assert!(provisioner.topic("orders").unwrap().groups.is_empty());
    }
}
