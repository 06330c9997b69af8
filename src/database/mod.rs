pub mod assert;

use anyhow::Context;
use diesel::{r2d2::ConnectionManager, MysqlConnection};
use r2d2::PooledConnection;

use crate::{config::DatabaseConfig, error::BookingResult};

pub type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<MysqlConnection>>;

pub fn build_pool(config: &DatabaseConfig) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<MysqlConnection>::new(config.url.as_str());
    r2d2::Pool::builder()
        .max_size(config.max_connections)
        .build(manager)
        .context("Failed to create pool")
}

pub fn get_db_conn(pool: &DbPool) -> BookingResult<DbConn> {
    Ok(pool.get()?)
}
