use super::*;
use drk_auth::Auth;
use drk_core::ID;
use drk_gameroom::Room;
use drk_rules::Player;
use drk_rules::RoomConfig;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

fn ws_url(room: ID<Room>) -> String {
    format!("/ws/{}", room)
}

/// POST /api/room/create — direct room creation by an authenticated host.
pub async fn create_room(
    hall: web::Data<Hall>,
    auth: Auth,
    config: web::Json<RoomConfig>,
) -> impl Responder {
    let host: ID<Player> = auth.member().cast();
    match hall.create_room(host, *config).await {
        Ok(room) => HttpResponse::Ok().json(serde_json::json!({
            "roomId": room.to_string(),
            "wsUrl": ws_url(room),
            "config": *config,
        })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// POST /api/matchmaking — queue for a room of the given configuration.
pub async fn matchmaking(
    hall: web::Data<Hall>,
    auth: Auth,
    config: web::Json<RoomConfig>,
) -> impl Responder {
    let player: ID<Player> = auth.member().cast();
    match hall.enqueue(player, *config).await {
        Ok(MatchOutcome::Queued) => {
            HttpResponse::Ok().json(serde_json::json!({ "status": "queued" }))
        }
        Ok(MatchOutcome::Matched { room }) => HttpResponse::Ok().json(serde_json::json!({
            "status": "matched",
            "roomId": room.to_string(),
            "wsUrl": ws_url(room),
        })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// GET /ws/{room_id} — upgrade and bridge into the room actor.
/// Session validation happens on the JOIN frame inside the room.
pub async fn ws(
    hall: web::Data<Hall>,
    path: web::Path<uuid::Uuid>,
    req: HttpRequest,
    body: web::Payload,
) -> impl Responder {
    let id: ID<Room> = ID::from(path.into_inner());
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match hall.bridge(id, session, stream).await {
            Ok(()) => response.map_into_left_body(),
            Err(e) => HttpResponse::NotFound()
                .body(e.to_string())
                .map_into_right_body(),
        },
        Err(_) => HttpResponse::UpgradeRequired()
            .body("websocket upgrade required")
            .map_into_right_body(),
    }
}
