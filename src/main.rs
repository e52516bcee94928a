use clap::Parser;
use mineral_cabinet::core::Pipeline;
use mineral_cabinet::utils::error::{ErrorSeverity, SiteError};
use mineral_cabinet::utils::logger;
use mineral_cabinet::views::SidebarView;
use mineral_cabinet::{Cli, Command, LocalStorage, LogFormat, SiteEngine, SitePipeline, SiteSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting mineral-cabinet");
    if cli.verbose {
        tracing::debug!("CLI arguments: {:?}", cli);
    }

    let result = match &cli.command {
        Command::Build(args) => match args.settings() {
            Ok(settings) => build(settings, cli.monitor).await,
            Err(e) => Err(e),
        },
        Command::Show { fragment, source } => match source.settings() {
            Ok(settings) => show(settings, fragment).await,
            Err(e) => Err(e),
        },
        Command::Search { query, source } => match source.settings() {
            Ok(settings) => search(settings, query).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        exit_with(e);
    }
    Ok(())
}

async fn build(settings: SiteSettings, monitor_enabled: bool) -> Result<(), SiteError> {
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(settings.output_path.clone());
    let pipeline = SitePipeline::new(storage, settings)?;
    let engine = SiteEngine::new_with_monitoring(pipeline, monitor_enabled);

    let output_path = engine.run().await?;
    tracing::info!("✅ Site built successfully!");
    println!("✅ Site built successfully!");
    println!("📁 Output saved to: {}", output_path);
    Ok(())
}

async fn show(settings: SiteSettings, fragment: &str) -> Result<(), SiteError> {
    let storage = LocalStorage::new(settings.output_path.clone());
    let pipeline = SitePipeline::new(storage, settings)?;

    let data = pipeline.extract().await?;
    let site = pipeline.build_site(data).await?;
    println!("{}", site.navigate_fragment(fragment));
    Ok(())
}

async fn search(settings: SiteSettings, query: &str) -> Result<(), SiteError> {
    let storage = LocalStorage::new(settings.output_path.clone());
    let pipeline = SitePipeline::new(storage, settings)?;

    let data = pipeline.extract().await?;
    let sidebar = SidebarView::build(&data.collection);
    let matches: Vec<_> = sidebar.entries.iter().filter(|e| e.matches(query)).collect();

    tracing::info!("🔎 {} of {} specimens match \"{}\"", matches.len(), sidebar.entries.len(), query);
    for entry in matches {
        println!("{}\t{}", entry.id, entry.label);
    }
    Ok(())
}

fn exit_with(e: SiteError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 可重試
        ErrorSeverity::High => 1,     // 資料或設定錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
