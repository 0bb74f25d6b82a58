use crate::core::topics::split_topic_spec;
use crate::core::{ConsumerConfig, ConsumerGroupBinding, DlqPolicy, SerdeError};
use crate::utils::error::{BinderError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const MAX_PARTITIONS: u32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinderConfig {
    #[serde(default)]
    pub binder: BinderSection,
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinderSection {
    #[serde(default)]
    pub serde_error: SerdeError,
    #[serde(default = "default_auto_create_topics")]
    pub auto_create_topics: bool,
    #[serde(default = "default_partitions")]
    pub default_partitions: u32,
}

impl Default for BinderSection {
    fn default() -> Self {
        Self {
            serde_error: SerdeError::default(),
            auto_create_topics: default_auto_create_topics(),
            default_partitions: default_partitions(),
        }
    }
}

fn default_auto_create_topics() -> bool {
    true
}

fn default_partitions() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    pub name: String,
    pub destination: Option<String>,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub enable_dlq: bool,
    pub dlq_name: Option<String>,
    pub dlq_partitions: Option<u32>,
    #[serde(default)]
    pub consumer: BTreeMap<String, String>,
    #[serde(default)]
    pub dlq_producer: BTreeMap<String, String>,
}

impl BindingConfig {
    pub fn to_binding(&self, binder: &BinderSection) -> Result<ConsumerGroupBinding> {
        let destination = validation::validate_required_field(
            &format!("bindings.{}.destination", self.name),
            &self.destination,
        )?;

        let policy = DlqPolicy::new(binder.serde_error, self.enable_dlq, self.dlq_name.clone());
        let consumer = ConsumerConfig {
            properties: self.consumer.clone(),
            dlq_partitions: self.dlq_partitions,
            dlq_producer_properties: self.dlq_producer.clone(),
        };

        Ok(ConsumerGroupBinding::new(destination.as_str(), self.group.as_str(), policy)
            .with_consumer_config(consumer))
    }
}

impl BinderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BinderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DLQ_TOPIC})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BinderError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.bindings.is_empty() {
            return Err(BinderError::MissingConfigError {
                field: "bindings".to_string(),
            });
        }

        validation::validate_range(
            "binder.default_partitions",
            self.binder.default_partitions,
            1,
            MAX_PARTITIONS,
        )?;

        let mut seen = HashSet::new();
        for binding in &self.bindings {
            validation::validate_non_empty_string("bindings.name", &binding.name)?;
            if !seen.insert(binding.name.as_str()) {
                return Err(BinderError::ConfigValidationError {
                    field: "bindings.name".to_string(),
                    message: format!("duplicate binding name '{}'", binding.name),
                });
            }

            let field = format!("bindings.{}.destination", binding.name);
            let destination = validation::validate_required_field(&field, &binding.destination)?;
            let topics = split_topic_spec(destination);
            if topics.is_empty() {
                return Err(BinderError::InvalidConfigValueError {
                    field,
                    value: destination.clone(),
                    reason: "Destination does not name any topic".to_string(),
                });
            }
            for topic in &topics {
                validation::validate_topic_name(&field, topic)?;
            }

            if let Some(dlq_name) = binding.dlq_name.as_deref().filter(|n| !n.is_empty()) {
                validation::validate_topic_name(&format!("bindings.{}.dlq_name", binding.name), dlq_name)?;
            }

            if let Some(partitions) = binding.dlq_partitions {
                validation::validate_range(
                    &format!("bindings.{}.dlq_partitions", binding.name),
                    partitions,
                    1,
                    MAX_PARTITIONS,
                )?;
            }
        }

        Ok(())
    }

    /// Bindings in declaration order, paired with their names.
    pub fn consumer_bindings(&self) -> Result<Vec<(String, ConsumerGroupBinding)>> {
        self.bindings
            .iter()
            .map(|b| Ok((b.name.clone(), b.to_binding(&self.binder)?)))
            .collect()
    }
}

impl Validate for BinderConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
