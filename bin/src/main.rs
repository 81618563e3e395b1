mod config;
mod draw;
mod errors;
mod handlers;
mod notify;
mod record;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use log::{info, warn};

use config::Config;
use notify::{DisabledNotifier, Notifier, SmsNotifier};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let config = Config::from_env().expect("configuration error");

    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool = Pool::builder()
        .build(manager)
        .expect("failed to create database pool");
    {
        let mut conn = pool.get().expect("failed to acquire a database connection");
        conn.run_pending_migrations(record::MIGRATIONS)
            .expect("failed to run database migrations");
    }

    let notifier: Arc<dyn Notifier> = match config.sms.clone() {
        Some(sms) => {
            info!("SMS notifications enabled from {}", sms.from_number);
            Arc::new(SmsNotifier::new(sms))
        }
        None => {
            warn!("no Twilio configuration, SMS notifications disabled");
            Arc::new(DisabledNotifier)
        }
    };
    let notifier_data: web::Data<dyn Notifier> = web::Data::from(notifier);
    let pool_data = web::Data::new(pool);

    info!("Starting lucky draw on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(notifier_data.clone())
            .route("/events", web::get().to(handlers::upcoming_events_handler))
            .route("/events", web::post().to(handlers::create_event_handler))
            .route("/events/all", web::get().to(handlers::all_events_handler))
            .route(
                "/events/{event_id}",
                web::delete().to(handlers::delete_event_handler),
            )
            .route(
                "/events/{event_id}/participants",
                web::get().to(handlers::participants_handler),
            )
            .route(
                "/events/{event_id}/participants",
                web::post().to(handlers::register_participant_handler),
            )
            .route(
                "/participants/{participant_id}",
                web::delete().to(handlers::delete_participant_handler),
            )
            .route(
                "/events/{event_id}/draw",
                web::post().to(handlers::draw_handler),
            )
            .route("/winners", web::get().to(handlers::winners_handler))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
