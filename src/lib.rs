//! Slot availability and booking conflict control for a single-tenant
//! appointment service.
//!
//! The scheduling core ([`scheduling::Scheduler`]) works against any
//! [`store::SchedulingStore`]; the binary wires it to MySQL through diesel and
//! serves it over actix-web.

#[macro_use]
extern crate diesel;

pub mod calendar;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod protocol;
pub mod schema;
pub mod scheduling;
pub mod store;
pub mod telemetry;
pub mod utils;

mod admin;
mod booking;
mod professional;

use actix_web::web;

/// Registers every HTTP scope. Expects a `web::Data<Scheduler>` on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        // professional
        .service(web::scope("/professional").configure(professional::config))
        // administrator
        .service(web::scope("/admin").configure(admin::config))
        // booking
        .service(web::scope("/booking").configure(booking::config));
}
