//! Unified durachok backend server.
//!
//! Wires the auth handshake, the matchmaker, and live room hosting into a
//! single actix-web server.
//!
//! ## Submodules
//!
//! - [`hall`] — room registry, rehydration, and WebSocket bridging
//! - [`handlers`] — HTTP route handlers
pub mod hall;
pub mod handlers;

pub use hall::Hall;
pub use hall::MatchOutcome;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let client = drk_database::db().await;
    drk_database::ensure::<drk_auth::Member>(&client).await.expect("users table");
    drk_database::ensure::<drk_database::SnapshotRow>(&client).await.expect("snapshots table");
    let crypto = Arc::new(drk_auth::Crypto::from_env());
    let hall = web::Data::new(Hall::new(client.clone(), crypto.clone()));
    let crypto = web::Data::from(crypto);
    let client = web::Data::new(client);
    log::info!("starting durachok server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(hall.clone())
            .app_data(crypto.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/api")
                    .route("/auth/telegram", web::post().to(drk_auth::telegram))
                    .route("/matchmaking", web::post().to(handlers::matchmaking))
                    .route("/room/create", web::post().to(handlers::create_room)),
            )
            .route("/ws/{room_id}", web::get().to(handlers::ws))
    })
    .workers(4)
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
