use crate::domain::ports::{ConsumerDestinationProperties, ProvisionedDestination, TopicProvisioner};
use crate::utils::error::{BinderError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub topics: BTreeMap<String, CatalogTopic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTopic {
    pub partitions: u32,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

/// Provisioner backed by a JSON topic catalog on local disk.
///
/// The file is re-read on every call so separate runs see each other's topics.
/// Updates hold an exclusive lock on `<catalog>.lock` and replace the catalog
/// by renaming a fully written temp file over it.
#[derive(Debug, Clone)]
pub struct LocalTopicCatalog {
    path: PathBuf,
    auto_create_topics: bool,
    default_partitions: u32,
}

impl LocalTopicCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
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

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 讀取目錄檔案，不存在時回傳空目錄
    pub fn load(&self) -> Result<CatalogDocument> {
        if !self.path.exists() {
            return Ok(CatalogDocument::default());
        }
        let data = fs::read(&self.path)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(CatalogDocument::default());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Runs `update` while holding the catalog's exclusive lock.
    fn with_exclusive_lock<T>(&self, update: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(self.parent_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        let mut lock = fd_lock::RwLock::new(file);
        let _guard = lock.write()?;
        update()
    }

    fn store(&self, document: &CatalogDocument) -> Result<()> {
        let data = serde_json::to_vec_pretty(document)?;

        let mut temp = NamedTempFile::new_in(self.parent_dir())?;
        temp.write_all(&data)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn ensure_topic(
        &self,
        document: &mut CatalogDocument,
        topic: &str,
        partitions: u32,
    ) -> std::result::Result<bool, String> {
        if document.topics.contains_key(topic) {
            return Ok(false);
        }
        if !self.auto_create_topics {
            return Err(format!(
                "topic '{}' does not exist and auto-creation is disabled",
                topic
            ));
        }
        document.topics.insert(
            topic.to_string(),
            CatalogTopic {
                partitions,
                groups: BTreeSet::new(),
            },
        );
        Ok(true)
    }
}

#[async_trait]
impl TopicProvisioner for LocalTopicCatalog {
    async fn provision_consumer_destination(
        &self,
        topic: &str,
        group: &str,
        properties: &ConsumerDestinationProperties,
    ) -> Result<ProvisionedDestination> {
        let dlq = properties
            .dlq_name
            .as_deref()
            .filter(|_| properties.enable_dlq);

        self.with_exclusive_lock(|| {
            let mut document = self.load().map_err(|e| {
                BinderError::provisioning(topic, group, format!("cannot read topic catalog: {}", e))
            })?;

            let created = self
                .ensure_topic(&mut document, topic, self.default_partitions)
                .map_err(|message| BinderError::provisioning(topic, group, message))?;
            let group_added = !group.is_empty()
                && document
                    .topics
                    .get_mut(topic)
                    .is_some_and(|entry| entry.groups.insert(group.to_string()));

            let mut dlq_created = false;
            if let Some(dlq) = dlq {
                let partitions = properties.dlq_partitions.unwrap_or(self.default_partitions);
                dlq_created = self
                    .ensure_topic(&mut document, dlq, partitions)
                    .map_err(|message| BinderError::provisioning(topic, group, message))?;
                if dlq_created {
                    tracing::info!("🆕 Created dead-letter topic '{}' ({} partitions)", dlq, partitions);
                }
            }

            if created || group_added || dlq_created {
                self.store(&document).map_err(|e| {
                    BinderError::provisioning(topic, group, format!("cannot write topic catalog: {}", e))
                })?;
            }

            Ok(ProvisionedDestination {
                name: topic.to_string(),
                created,
            })
        })
        .map_err(|e| match e {
            BinderError::IoError(io) => BinderError::provisioning(
                topic,
                group,
                format!("cannot lock topic catalog: {}", io),
            ),
            other => other,
        })
    }
}
