use actix_web::{App, HttpServer};
use anyhow::Context;
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write;

use wichtel_backend::{
    app::AppServices,
    config::Config,
    database::{create_pool, run_migrations},
    middlewares::{create_access_logger, create_cors},
    notifier::{ChangeNotifier, Collection},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().context("Failed to load configuration file")?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // Change observers only log for now; live push would hook in here
    let notifier = ChangeNotifier::with_capacity(config.notify.capacity);
    let _observers: Vec<_> = Collection::ALL
        .into_iter()
        .map(|collection| {
            notifier.on_change(collection, move |change| {
                log::debug!(
                    "{} changed: {:?} (event {})",
                    collection.table_name(),
                    change.kind,
                    change.event_id
                );
            })
        })
        .collect();

    let services = AppServices::new(pool, &config, notifier);

    log::info!(
        "Starting HTTP server at {}:{} (draw attempts: {})",
        config.server.host,
        config.server.port,
        config.draw.max_attempts
    );

    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(create_access_logger())
            .wrap(create_cors())
            .configure(swagger_config)
            .configure(move |cfg| services.configure(cfg))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
