use crate::domain::model::DispatchTarget;
use crate::domain::ports::DispatchRegistry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of dead-letter dispatch targets, keyed by input topic.
///
/// Safe to share between bindings. A later registration for a topic replaces
/// the earlier one.
#[derive(Debug, Default)]
pub struct SendToDlqAndContinue {
    dispatchers: RwLock<HashMap<String, Arc<DispatchTarget>>>,
}

impl SendToDlqAndContinue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch_for(&self, topic: &str) -> Option<Arc<DispatchTarget>> {
        self.dispatchers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .cloned()
    }

    pub fn registered_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .dispatchers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        topics.sort();
        topics
    }

    pub fn len(&self) -> usize {
        self.dispatchers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DispatchRegistry for SendToDlqAndContinue {
    fn register(&self, topic: &str, target: Arc<DispatchTarget>) {
        tracing::debug!("Registering DLQ dispatch {} -> {}", topic, target.dlq_name);
        self.dispatchers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(topic.to_string(), target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ConsumerConfig, DlqPolicy};

    fn target(name: &str) -> Arc<DispatchTarget> {
        Arc::new(DispatchTarget::new(name, DlqPolicy::default(), ConsumerConfig::default()))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = SendToDlqAndContinue::new();
        assert!(registry.is_empty());

        let orders = target("error.orders.g1");
        registry.register("orders", orders.clone());
        registry.register("payments", target("error.payments.g1"));

        assert_eq!(registry.len(), 2);
        assert!(Arc::ptr_eq(&registry.dispatch_for("orders").unwrap(), &orders));
        assert!(registry.dispatch_for("refunds").is_none());
        assert_eq!(registry.registered_topics(), vec!["orders", "payments"]);
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let registry = SendToDlqAndContinue::new();
        registry.register("orders", target("error.orders.g1"));
        let replacement = target("shared.dlq");
        registry.register("orders", replacement.clone());

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.dispatch_for("orders").unwrap(), &replacement));
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(SendToDlqAndContinue::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.register(&format!("topic-{}", i), target(&format!("error.topic-{}.g", i)));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
    }
}
