use clap::Parser;
use texton_core::api::{AppConfig, LoggingConfig};
use texton_devserver::error::DevServerError;
use texton_devserver::http;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

/// Serves the built TextOn UI and proxies `/api` to the backend.
#[derive(Parser, Debug)]
#[command(name = "texton-devserver", version)]
struct Args {
    /// Listen address (overrides `dev_server.host`).
    #[arg(long)]
    host: Option<String>,

    /// Listen port, must be greater than 10000 (overrides `dev_server.port`).
    #[arg(long)]
    port: Option<u16>,

    /// Backend origin for `/api` requests, e.g. http://localhost:8000.
    #[arg(long)]
    api_target: Option<String>,

    /// Directory holding the built UI bundle.
    #[arg(long)]
    static_dir: Option<String>,
}

impl Args {
    fn apply(self, cfg: &mut AppConfig) {
        let dev = &mut cfg.dev_server;
        if let Some(host) = self.host {
            dev.host = host;
        }
        if let Some(port) = self.port {
            dev.port = port;
        }
        if let Some(target) = self.api_target {
            dev.api_target = target.trim_end_matches('/').to_string();
        }
        if let Some(dir) = self.static_dir {
            dev.static_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<(), DevServerError> {
    let args = Args::parse();
    let mut cfg =
        texton_core::api::load_default().map_err(|e| DevServerError::Config(e.to_string()))?;
    init_tracing(&cfg.logging).map_err(DevServerError::Config)?;
    args.apply(&mut cfg);

    http::serve(&cfg.dev_server).await
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("texton-devserver"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("texton-devserver.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
