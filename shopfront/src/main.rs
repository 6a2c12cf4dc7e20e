use shop_client::{ClientConfig, ShopApi};
use shopfront::{App, AppState, Config, ConsoleUi, EventBus, Ui};
use std::sync::Arc;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }
}

/// Initialize logging. Renders go to stdout, logs to stderr plus the
/// optional rolling file; the returned guard must stay alive for the file
/// writer to flush.
fn init_tracing(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = if let Ok(from_env) = EnvFilter::try_from_default_env() {
        from_env
    } else if cfg!(debug_assertions) {
        EnvFilter::new("info,shopfront=debug,shop_client=debug")
    } else {
        EnvFilter::new("info")
    };

    let stderr_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_target(true)
        .with_writer(std::io::stderr);

    let mut file_guard = None;
    let file_layer = log_dir.map(|dir| {
        std::fs::create_dir_all(dir).ok();
        let file_appender = tracing_appender::rolling::daily(dir, "shopfront.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);
        fmt::layer()
            .with_timer(LocalTimer)
            .with_ansi(false)
            .with_writer(non_blocking)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(target: "panic", message = %info, backtrace = %backtrace, "panic occurred");
    }));

    file_guard
}

fn print_banner() {
    println!(
        r#"
   _____ __                ____                 __
  / ___// /_  ____  ____  / __/________  ____  / /_
  \__ \/ __ \/ __ \/ __ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / / / / /_/ / /_/ / __/ /  / /_/ / / / / /_
/____/_/ /_/\____/ .___/_/ /_/   \____/_/ /_/\__/
                /_/
    "#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env, logging)
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let _guard = init_tracing(config.log_dir.as_deref());

    print_banner();
    tracing::info!(api_url = %config.api_url, cdn_url = %config.cdn_url, "shopfront starting");

    // 2. Explicit instances, injected by reference - no module singletons
    let bus = Arc::new(EventBus::new());
    let state = Arc::new(AppState::new(Arc::clone(&bus)));
    let api: Arc<dyn ShopApi> = Arc::new(
        ClientConfig::new(config.api_url.clone())
            .with_cdn_url(config.cdn_url.clone())
            .with_timeout(config.request_timeout)
            .build(),
    );
    let ui: Arc<dyn Ui> = Arc::new(ConsoleUi::new());
    let app = App::new(Arc::clone(&bus), Arc::clone(&state), api, ui);

    // 3. Startup fetch; a failure leaves an empty catalog and the user the
    //    'reload' command to retry
    if let Err(err) = app.load_catalog().await {
        tracing::error!(%err, "initial catalog fetch failed");
    }

    // 4. Console front end until EOF or quit
    shopfront::repl::run(&app).await
}
