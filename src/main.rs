use anyhow::Context;
use clap::Parser;
use dlq_binder::core::binder::BindingReport;
use dlq_binder::core::TopicProvisioner;
use dlq_binder::utils::error::ErrorSeverity;
use dlq_binder::utils::{logger, validation::Validate};
use dlq_binder::{
    BinderConfig, BinderError, CliConfig, ConsumerBinder, DlqRoutingTableBuilder,
    InMemoryTopicProvisioner, LocalTopicCatalog, SendToDlqAndContinue,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting dlq-binder");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let reports = match run(&cli).await {
        Ok(reports) => reports,
        Err(e) => exit_with(e),
    };

    let output = serde_json::to_string_pretty(&reports).context("failed to render binding report")?;
    println!("{}", output);
    Ok(())
}

async fn run(cli: &CliConfig) -> dlq_binder::Result<Vec<BindingReport>> {
    cli.validate()?;

    let config = BinderConfig::from_file(&cli.config)?;
    config.validate()?;
    let bindings = config.consumer_bindings()?;

    let auto_create = config.binder.auto_create_topics && !cli.no_auto_create;
    let partitions = config.binder.default_partitions;

    // 選擇主題目錄: 本地 JSON 檔案或記憶體
    match &cli.catalog {
        Some(path) => {
            tracing::info!("📁 Using topic catalog at {}", path);
            let catalog = LocalTopicCatalog::new(path)
                .with_auto_create_topics(auto_create)
                .with_default_partitions(partitions);
            prepare(catalog, &bindings).await
        }
        None => {
            let provisioner = InMemoryTopicProvisioner::new()
                .with_auto_create_topics(auto_create)
                .with_default_partitions(partitions);
            prepare(provisioner, &bindings).await
        }
    }
}

async fn prepare<P: TopicProvisioner>(
    provisioner: P,
    bindings: &[(String, dlq_binder::core::ConsumerGroupBinding)],
) -> dlq_binder::Result<Vec<BindingReport>> {
    let registry = Arc::new(SendToDlqAndContinue::new());
    let binder = ConsumerBinder::new(DlqRoutingTableBuilder::new(provisioner, Arc::clone(&registry)));

    let reports = binder.prepare_all(bindings).await?;
    tracing::info!(
        "✅ Prepared {} binding(s), {} DLQ dispatcher(s) registered",
        reports.len(),
        registry.len()
    );
    Ok(reports)
}

fn exit_with(e: BinderError) -> ! {
    tracing::error!(
        "❌ Binding preparation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
