use crate::utils::error::{BinderError, Result};

/// Kafka rejects topic names longer than this.
pub const MAX_TOPIC_NAME_LENGTH: usize = 249;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_topic_name(field_name: &str, topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: topic.to_string(),
            reason: "Topic name cannot be empty".to_string(),
        });
    }

    if topic == "." || topic == ".." {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: topic.to_string(),
            reason: "Topic name cannot be '.' or '..'".to_string(),
        });
    }

    if topic.len() > MAX_TOPIC_NAME_LENGTH {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: topic.to_string(),
            reason: format!(
                "Topic name is {} characters long, maximum is {}",
                topic.len(),
                MAX_TOPIC_NAME_LENGTH
            ),
        });
    }

    if let Some(c) = topic
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: topic.to_string(),
            reason: format!("Illegal character '{}' in topic name", c),
        });
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| BinderError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic_name() {
        assert!(validate_topic_name("destination", "orders").is_ok());
        assert!(validate_topic_name("destination", "error.orders.g1").is_ok());
        assert!(validate_topic_name("destination", "error.orders.").is_ok());
        assert!(validate_topic_name("destination", "my_topic-v2").is_ok());
        assert!(validate_topic_name("destination", "").is_err());
        assert!(validate_topic_name("destination", ".").is_err());
        assert!(validate_topic_name("destination", "..").is_err());
        assert!(validate_topic_name("destination", "orders payments").is_err());
        assert!(validate_topic_name("destination", "orders/1").is_err());
    }

    #[test]
    fn test_validate_topic_name_length() {
        let longest = "t".repeat(MAX_TOPIC_NAME_LENGTH);
        assert!(validate_topic_name("destination", &longest).is_ok());

        let too_long = "t".repeat(MAX_TOPIC_NAME_LENGTH + 1);
        assert!(validate_topic_name("destination", &too_long).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("dlq_partitions", 3u32, 1, 10_000).is_ok());
        assert!(validate_range("dlq_partitions", 0u32, 1, 10_000).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("catalog.json".to_string());
        assert_eq!(
            validate_required_field("catalog", &present).unwrap(),
            "catalog.json"
        );

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("catalog", &missing),
            Err(BinderError::MissingConfigError { .. })
        ));
    }
}
