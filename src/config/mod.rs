pub mod toml_config;

pub use toml_config::{BinderConfig, BinderSection, BindingConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dlq-binder")]
#[command(about = "Provision consumer topics and build their dead-letter routing tables")]
pub struct CliConfig {
    #[arg(long, help = "Path to the binder TOML configuration")]
    pub config: String,

    #[arg(long, help = "Persist provisioned topics in this JSON catalog instead of memory")]
    pub catalog: Option<String>,

    #[arg(long, help = "Fail instead of creating topics that do not exist")]
    pub no_auto_create: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("config", &self.config)?;
        if let Some(catalog) = &self.catalog {
            validation::validate_path("catalog", catalog)?;
        }
        Ok(())
    }
}
