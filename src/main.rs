use clap::Parser;
use feed_auth::adapters::progress::ConsoleProgress;
use feed_auth::adapters::task_variables::{TaskVariableWriter, PLUGIN_PATHS_KEY};
use feed_auth::config::toml_config::TomlConfig;
use feed_auth::domain::model::ConfigValue;
use feed_auth::domain::ports::VariableSink;
use feed_auth::utils::error::ErrorSeverity;
use feed_auth::utils::{logger, validation::Validate};
use feed_auth::{
    CliConfig, CredProviderEngine, CredProviderError, CredentialProviderLocator,
    HttpLocationApiFactory, Result, Settings,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting feed-auth");

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Credential provider setup failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(config: CliConfig) -> Result<()> {
    let file = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            Some(file)
        }
        None => None,
    };

    let settings = Settings::resolve(
        &config.overrides(),
        file.as_ref(),
        &|name: &str| std::env::var(name).ok(),
    )?;

    // netfx 只能在 Windows 上用，先擋下來再做網路呼叫
    if let Some(provider) = &settings.credential_provider {
        provider.variant.ensure_supported()?;
    }

    let engine = CredProviderEngine::new(
        HttpLocationApiFactory::new()?,
        settings.context.location.clone(),
        settings.context.access_token(),
        ConsoleProgress,
    );
    // 每個值一算出來就寫到 stdout
    let mut variables = TaskVariableWriter::new(std::io::stdout());
    let config = engine
        .configure(
            settings.protocol,
            Some(settings.service_connections.as_slice()),
            &mut variables,
        )
        .await?;
    let mut variable_count = 2 + usize::from(config.external_endpoints.is_some());

    if let Some(provider) = &settings.credential_provider {
        let task_root = match &provider.task_root {
            Some(root) => root.clone(),
            None => default_task_root()?,
        };
        let plugin_path = CredentialProviderLocator::new(task_root).locate(provider.variant);
        println!(
            "Configuring tools to use the {} credential provider at {}",
            provider.variant,
            plugin_path.display()
        );
        variables.set(&ConfigValue::plain(
            PLUGIN_PATHS_KEY,
            plugin_path.to_string_lossy().into_owned(),
        ))?;
        variable_count += 1;
    }

    tracing::info!("✅ Set {} credential provider variables", variable_count);
    Ok(())
}

fn default_task_root() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| CredProviderError::ConfigError {
            message: format!("Cannot determine the task root from {}", exe.display()),
        })
}
