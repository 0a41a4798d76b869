use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;

use classes_numerique::config::AppConfig;
use classes_numerique::models::AppStartTime;
use classes_numerique::routes;
use classes_numerique::runtime::lifetime;
use classes_numerique::utils::{build_cors, json_error_handler, query_error_handler};

/// 初始化日志，返回的 guard 需要存活到进程结束
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(config.is_development());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .event_format(format);

    // 开发环境可读输出，其余环境 JSON 行
    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }

    guard
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let app_start_time = AppStartTime::now();

    setup_panic!();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();

    let _log_guard = init_tracing(config);

    warn!(
        "Starting {} ({} v{}, environment: {})",
        config.app.system_name,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage.clone();
    let cache = startup.cache.clone();

    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds()
    );
    warn!("Using {} worker(s) for the server", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.cors))
            .wrap(Compress::default())
            // 已设置的响应头不会被覆盖，/uploads 的缓存策略保留
            .wrap(
                DefaultHeaders::new()
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(routes::configure_auth_routes)
            .configure(routes::configure_classes_routes)
            .configure(routes::configure_courses_routes)
            .configure(routes::configure_exercises_routes)
            .configure(routes::configure_attempts_routes)
            .configure(routes::configure_upload_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(
        config.server.timeouts.client_request,
    ))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            warn!("Listening on Unix socket {}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        None => {
            let bind_address = config.server_bind_address();
            warn!("Listening on http://{}", bind_address);
            server.bind(bind_address)?
        }
    };

    #[cfg(not(unix))]
    let server = {
        let bind_address = config.server_bind_address();
        warn!("Listening on http://{}", bind_address);
        server.bind(bind_address)?
    };

    tokio::select! {
        res = server.run() => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
