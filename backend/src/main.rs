use actix_web::{middleware, web, App, HttpServer};
use backend::config::Settings;
use backend::services;
use backend::state::AppState;
use backend::storage;
use env_logger::Env;
use log::{info, warn};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings =
        Settings::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    tokio::fs::create_dir_all(&settings.upload_dir).await?;

    let store = storage::open_store(&settings.storage).map_err(io::Error::other)?;
    let probe = store.clone();
    match web::block(move || probe.ping()).await {
        Ok(Ok(())) => info!("Storage backend `{}` is reachable", store.backend_name()),
        Ok(Err(e)) => warn!(
            "Storage backend `{}` is not reachable yet, submissions will not be saved: {}",
            store.backend_name(),
            e
        ),
        Err(e) => warn!("Storage check could not run: {}", e),
    }

    let state = AppState::new(store, &settings);
    let url = format!("http://{}:{}", settings.host, settings.port);
    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().limit(4096))
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
