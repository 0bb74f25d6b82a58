/// Splits a comma-delimited destination into topic names.
///
/// Tokens are trimmed and empty ones dropped. Order and duplicates are kept.
pub fn split_topic_spec(topic_spec: &str) -> Vec<String> {
    topic_spec
        .split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-topic dead-letter name: `error.<topic>.<group>`. The group segment may be empty.
pub fn derived_dlq_name(topic: &str, group: &str) -> String {
    format!("error.{}.{}", topic, group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_order() {
        assert_eq!(split_topic_spec("orders,payments"), vec!["orders", "payments"]);
        assert_eq!(split_topic_spec("single"), vec!["single"]);
    }

    #[test]
    fn test_split_trims_and_drops_empty_tokens() {
        assert_eq!(
            split_topic_spec(" ,orders , ,payments,, "),
            vec!["orders", "payments"]
        );
        assert!(split_topic_spec("").is_empty());
        assert!(split_topic_spec(" , ,").is_empty());
    }

    #[test]
    fn test_split_keeps_duplicates() {
        assert_eq!(split_topic_spec("orders,orders"), vec!["orders", "orders"]);
    }

    #[test]
    fn test_derived_dlq_name() {
        assert_eq!(derived_dlq_name("orders", "g1"), "error.orders.g1");
        assert_eq!(derived_dlq_name("orders", ""), "error.orders.");
    }
}
