use std::sync::Arc;

use actix_web::{middleware::Logger, App, HttpServer};
use anyhow::Context;
use tracing::info;

use booking_server::{
    config::Config,
    database::build_pool,
    scheduling::Scheduler,
    store::MysqlStore,
    telemetry::init_tracing,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;

    let config = Config::from_env()?;
    let pool = build_pool(&config.database)?;
    let clock = config.clock()?;

    let scheduler = Scheduler::new(Arc::new(MysqlStore::new(pool)), Arc::new(clock), config.booking);

    let bind = (config.server.host.clone(), config.server.port);
    info!(host = %bind.0, port = bind.1, grid = config.booking.grid_step_minutes(), "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .data(scheduler.clone())
            .configure(booking_server::config)
    })
    .bind(bind)
    .context("Failed to bind server address")?
    .run()
    .await
    .context("Server error")
}
