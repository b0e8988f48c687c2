use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfinder::app::App;
use wayfinder::config::AppConfig;
use wayfinder::narrate::StyleLevel;

#[derive(Parser, Debug)]
#[command(name = "wayfinder", about = "Campus wayfinding with spoken pirate clues")]
struct Args {
    /// Campus collection to search and route within
    #[arg(long)]
    campus: Option<u32>,

    /// Style intensity for rewritten instructions
    #[arg(long, value_enum, default_value_t = StyleLevel::Classic)]
    style: StyleLevel,

    /// Keep the plain instruction texts
    #[arg(long)]
    no_transform: bool,

    /// Skip spoken narration
    #[arg(long)]
    no_speech: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfinder=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::default().with_style(args.style);
    if let Some(campus) = args.campus {
        config = config.with_campus(campus);
    }
    if let Ok(key) = std::env::var("WAYFINDER_API_KEY") {
        config = config.with_api_key(key);
    }
    // Without a key the hosted text services are switched off rather than
    // failing on first use
    if config.narrate.api_key.is_empty() {
        config = config.without_transform().without_audio_output();
    }
    if args.no_transform {
        config = config.without_transform();
    }
    if args.no_speech {
        config = config.without_audio_output();
    }

    config
        .validate()
        .map_err(wayfinder::WayfinderError::ConfigError)?;

    info!("Starting wayfinder");

    let mut app = App::new(config);
    app.run().await?;

    Ok(())
}
