use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use hr_core::{catalog::CAREERS, generate, NewsPayload, Preset, PresetRegistry, DEFAULT_BATCH_SIZE};
use hr_web::{create_app, AppState, DeploymentInfo, ServerConfig, ENDPOINTS};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use url::Url;

mod duration;
mod logging;
mod smoke;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mock HR news JSON API", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the local development server
    Serve {
        #[command(flatten)]
        server: ServeArgs,
        #[command(flatten)]
        generation: GenerationArgs,
    },
    /// Print one generated payload to stdout
    Generate {
        #[command(flatten)]
        generation: GenerationArgs,
        /// Date the batch is generated relative to (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        reference_date: Option<NaiveDate>,
        /// Print every record and the summary instead of the API payload
        #[arg(long)]
        full: bool,
    },
    /// Hit a running deployment and report status, content type and body preview
    Smoke {
        /// Base URL of the deployment, e.g. http://localhost:3000
        base_url: Url,
        /// Per-request timeout (e.g. 10s, 1m30s)
        #[arg(long, default_value = "10s")]
        timeout: HumanDuration,
    },
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    #[arg(long, env = "HR_NEWS_HOST", default_value = "127.0.0.1")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    /// Directory served for paths outside the API
    #[arg(long, env = "HR_NEWS_STATIC_DIR")]
    static_dir: Option<PathBuf>,
    #[arg(long, env = "APP_ENV")]
    app_env: Option<String>,
    #[arg(long, env = "DEPLOY_ENV")]
    deploy_env: Option<String>,
    #[arg(long, env = "DEPLOY_URL")]
    deploy_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct GenerationArgs {
    /// Preset used when a request does not name one
    #[arg(long, env = "HR_NEWS_PRESET", default_value = CAREERS)]
    preset: String,
    /// JSON file with an extra preset (name, catalog, templates, top_labels)
    #[arg(long, env = "HR_NEWS_CATALOG_FILE")]
    catalog_file: Option<PathBuf>,
    /// Compute top_category/top_source from the batch instead of the preset's fixed labels
    #[arg(long)]
    derive_top_labels: bool,
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE as u64, value_parser = clap::value_parser!(u64).range(1..=10_000))]
    batch_size: u64,
    /// Seed the random source so every generation is identical
    #[arg(long)]
    seed: Option<u64>,
}

impl GenerationArgs {
    fn registry(&self) -> Result<PresetRegistry> {
        let mut registry = PresetRegistry::default();
        if let Some(path) = &self.catalog_file {
            let preset = Preset::from_json_file(path)
                .with_context(|| format!("failed to load preset from {}", path.display()))?;
            info!("📚 Loaded preset `{}` from {}", preset.name, path.display());
            registry = registry.with_preset(preset)?;
        }
        if self.derive_top_labels {
            registry = registry.with_most_viewed_labels();
        }
        Ok(registry.with_default(&self.preset)?)
    }

    fn batch_size(&self) -> Result<usize> {
        Ok(usize::try_from(self.batch_size)?)
    }
}

async fn serve(server: ServeArgs, generation: GenerationArgs) -> Result<()> {
    let registry = generation.registry()?;
    info!(
        "📰 Default preset: {} (available: {})",
        registry.default_preset().name,
        registry.names().join(", ")
    );

    let config = ServerConfig {
        batch_size: generation.batch_size()?,
        seed: generation.seed,
        static_dir: server.static_dir.clone(),
        deployment: DeploymentInfo {
            app_env: server.app_env,
            deploy_env: server.deploy_env,
            deploy_url: server.deploy_url,
        },
    };
    if let Some(dir) = &config.static_dir {
        if !dir.is_dir() {
            bail!("static directory {} does not exist", dir.display());
        }
        info!("📁 Serving static files from {}", dir.display());
    }

    let app = create_app(AppState::new(registry, config)).await;

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let local = listener.local_addr()?;

    info!("🚀 HR News server running on http://{}", local);
    info!("📊 API endpoints:");
    for (path, description) in ENDPOINTS {
        info!("   - GET {} - {}", path, description);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}

fn reference_time(date: Option<NaiveDate>) -> Result<DateTime<Utc>> {
    match date {
        None => Ok(Utc::now()),
        Some(date) => {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .context("invalid reference date")?;
            Ok(Utc.from_utc_datetime(&midnight))
        }
    }
}

fn generate_json(
    generation: &GenerationArgs,
    reference_date: Option<NaiveDate>,
    full: bool,
) -> Result<String> {
    let registry = generation.registry()?;
    let preset = registry.default_preset();
    let reference = reference_time(reference_date)?;
    let batch_size = generation.batch_size()?;

    let batch = match generation.seed {
        Some(seed) => generate(&mut StdRng::seed_from_u64(seed), batch_size, reference, preset)?,
        None => generate(&mut rand::thread_rng(), batch_size, reference, preset)?,
    };

    let json = if full {
        serde_json::to_string_pretty(&batch)?
    } else {
        serde_json::to_string_pretty(&NewsPayload::from_batch(&batch, Utc::now()))?
    };
    Ok(json)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Serve { server, generation } => serve(server, generation).await?,
        Commands::Generate {
            generation,
            reference_date,
            full,
        } => println!("{}", generate_json(&generation, reference_date, full)?),
        Commands::Smoke { base_url, timeout } => {
            let outcomes = smoke::run(&base_url, timeout.0).await?;
            let failed = outcomes.iter().filter(|o| !o.passed()).count();
            if failed > 0 {
                bail!("{} of {} smoke checks failed", failed, outcomes.len());
            }
        }
    }

    Ok(())
}
