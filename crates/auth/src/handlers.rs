use super::*;
use drk_core::Unique;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

/// POST /api/auth/telegram — validates the signed handshake, upserts the
/// user row, and mints a session token.
pub async fn telegram(
    db: web::Data<Arc<Client>>,
    crypto: web::Data<Crypto>,
    req: web::Json<TelegramAuthRequest>,
) -> impl Responder {
    let user = match crypto.validate_handshake(&req.init_data) {
        Ok(user) => user,
        Err(e) => {
            log::info!("[auth] handshake rejected: {}", e);
            return HttpResponse::Unauthorized().body(e.to_string());
        }
    };
    let member = match db.upsert_member(&user).await {
        Ok(member) => member,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    log::info!("[auth] authenticated member {}", member.id());
    let claims = SessionClaims::new(member.id());
    HttpResponse::Ok().json(AuthResponse {
        session_token: crypto.encode(&claims),
        user: UserInfo {
            id: member.id().to_string(),
            first_name: member.first_name().to_string(),
            username: member.username().map(str::to_string),
        },
    })
}
