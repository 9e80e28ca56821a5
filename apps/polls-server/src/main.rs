use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::TokenVerifier;
use runtime::{AppConfig, CliArgs, DatabaseConfig, ImagesConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use url::Url;

use api_ingress::{ApiIngress, ApiIngressConfig};
use polls::infra::storage::SeaOrmPollsRepository;
use polls::PollsConfig;
use users::infra::storage::SeaOrmUsersRepository;
use users::{JwtCodec, PasswordHasher};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` so a missing database file is created.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create database directory {}", dir.display()))?;
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// Polls Server - REST backend for a polling web app
#[derive(Parser)]
#[command(name = "polls-server")]
#[command(about = "Polls Server - REST backend for a polling web app")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, config.home_dir());
    tracing::info!("Polls Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// DSN with any password masked, for logs and error messages.
fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_ok() {
                url.to_string()
            } else {
                dsn.to_owned()
            }
        }
        _ => dsn.to_owned(),
    }
}

async fn connect_database(cfg: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    let backend = detect_from_dsn(cfg)?;
    let dsn = match backend {
        "sqlite" => absolutize_sqlite_dsn(cfg.url.trim(), base_dir)?,
        _ => cfg.url.trim().to_owned(),
    };

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if let Some(max) = cfg.max_conns {
        opts.max_connections(max);
    }
    if let Some(ms) = cfg.busy_timeout_ms {
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(Duration::from_millis(ms.into())));
    }

    let shown = redact_dsn(&dsn);
    tracing::info!(backend, "Connecting to database: {}", shown);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {shown}"))?;

    users::Migrator::up(&db, None)
        .await
        .context("users migrations failed")?;
    polls::Migrator::up(&db, None)
        .await
        .context("polls migrations failed")?;
    tracing::info!("Database migrations applied");

    Ok(db)
}

fn polls_config(images: &ImagesConfig) -> PollsConfig {
    PollsConfig {
        optimizer_api_key: images.api_key.clone(),
        optimizer_base_url: images.base_url.clone(),
        image_timeout: images.timeout,
        max_image_bytes: images.max_bytes,
        ..Default::default()
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    let db = connect_database(&config.database, config.home_dir()).await?;

    tracing::info!("Initializing modules...");
    let tokens = Arc::new(JwtCodec::new(&config.auth.jwt_secret, config.auth.token_ttl));
    let verifier: Arc<dyn TokenVerifier> = tokens.clone();

    let users_service = Arc::new(users::Service::new(
        Arc::new(SeaOrmUsersRepository::new(db.clone())),
        PasswordHasher::new(config.auth.bcrypt_cost),
        tokens,
        users::ServiceConfig::default(),
    ));

    let polls_cfg = polls_config(&config.images);
    let ingestor = polls::infra::images::build_ingestor(&polls_cfg)?;
    let polls_service = Arc::new(polls::Service::new(
        Arc::new(SeaOrmPollsRepository::new(db)),
        ingestor,
        polls::ServiceConfig::from(&polls_cfg),
    ));

    let router = ApiIngress::new(ApiIngressConfig::from(&config.server))
        .mount(
            "/api/users",
            users::api::rest::routes::router(users_service, verifier.clone()),
        )
        .mount(
            "/api/polls",
            polls::api::rest::routes::router(polls_service, verifier),
        )
        .into_router();

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address '{}:{}'",
                config.server.host, config.server.port
            )
        })?;

    api_ingress::serve(addr, router, async {
        if let Err(e) = modkit::wait_for_shutdown().await {
            tracing::error!("shutdown signal handler failed: {e}");
        }
    })
    .await
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    detect_from_dsn(&config.database)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsn_password_is_masked() {
        let shown = redact_dsn("postgres://u:secret@h/db");
        assert!(!shown.contains("secret"));
        assert_eq!(shown, "postgres://u:***@h/db");

        assert_eq!(redact_dsn("postgres://u@h/db"), "postgres://u@h/db");
        assert_eq!(redact_dsn("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            redact_dsn("sqlite:///tmp/polls.db?mode=rwc"),
            "sqlite:///tmp/polls.db?mode=rwc"
        );
    }

    #[test]
    fn sqlite_dsn_is_anchored_at_home_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://database/polls.db", tmp.path()).unwrap();
        assert!(dsn.starts_with("sqlite://"));
        assert!(dsn.ends_with("database/polls.db?mode=rwc"));
        assert!(tmp.path().join("database").is_dir());
    }

    #[test]
    fn sqlite_dsn_keeps_memory_and_query() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(
            absolutize_sqlite_dsn("sqlite::memory:", tmp.path()).unwrap(),
            "sqlite::memory:"
        );
        let dsn = absolutize_sqlite_dsn("sqlite://x.db?mode=ro", tmp.path()).unwrap();
        assert!(dsn.ends_with("x.db?mode=ro"));
    }

    #[test]
    fn dsn_scheme_detection() {
        let cfg = |url: &str| DatabaseConfig {
            url: url.into(),
            ..Default::default()
        };
        assert_eq!(detect_from_dsn(&cfg("sqlite::memory:")).unwrap(), "sqlite");
        assert_eq!(
            detect_from_dsn(&cfg("postgres://u:p@localhost/polls")).unwrap(),
            "postgres"
        );
        assert!(detect_from_dsn(&cfg("mysql://localhost/x")).is_err());
        assert!(detect_from_dsn(&cfg("  ")).is_err());
    }

    #[test]
    fn images_section_feeds_polls_config() {
        let images = ImagesConfig {
            api_key: "k".into(),
            base_url: "http://localhost:9".into(),
            timeout: Duration::from_secs(3),
            max_bytes: 4096,
        };
        let cfg = polls_config(&images);
        assert_eq!(cfg.optimizer_api_key, "k");
        assert_eq!(cfg.image_timeout, Duration::from_secs(3));
        assert_eq!(cfg.max_image_bytes, 4096);
        assert_eq!(cfg.max_options, 5);
    }
}
