use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use i18n_props::config::{Cli, Command, DocArgs, DocConfig, GeminiSettings, PropsArgs, PropsConfig};
use i18n_props::document::DocumentPipeline;
use i18n_props::pipeline::PropsPipeline;
use i18n_props::stats::print_report;
use i18n_props::translator::GeminiClient;
use i18n_props::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    // .env 不存在时忽略
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("已载入环境变量文件: {}", path.display());
    }

    if let Err(e) = run(&cli).await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let settings = GeminiSettings::from_env(cli)?;

    info!("*** 使用的模型: {}", settings.model);

    let client = GeminiClient::new(settings).context("创建HTTP客户端失败")?;

    match &cli.command {
        Command::Props(args) => translate_properties(&client, args).await,
        Command::Doc(args) => translate_document(&client, args).await,
    }
}

/// 翻译 .properties 文件
async fn translate_properties(client: &GeminiClient, args: &PropsArgs) -> Result<()> {
    let config = PropsConfig::from_args(args)?;

    info!("📂 输入文件: {}", config.input_path().display());
    info!("🌐 目标语言: {}", config.languages().join(", "));
    info!("📦 批处理大小: {}", config.batch_size());
    info!("🔤 输出转为Unicode编码: {}", config.is_unicode_escaped());

    let report = PropsPipeline::new(client, &config)
        .run()
        .await
        .context(".properties 翻译失败")?;

    if args.stats {
        print_report(&report);
    }
    Ok(())
}

/// 翻译整份文档
async fn translate_document(client: &GeminiClient, args: &DocArgs) -> Result<()> {
    let config = DocConfig::from_args(args)?;

    info!("📂 输入文件: {}", config.input_path().display());
    info!("🌐 目标语言: {}", config.languages().join(", "));

    let report = DocumentPipeline::new(client, &config)
        .run()
        .await
        .context("文档翻译失败")?;

    if args.stats {
        print_report(&report);
    }
    Ok(())
}
