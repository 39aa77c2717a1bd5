use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;

/// Extractor for authenticated requests.
/// Validates the bearer session token MAC and expiry; sessions are
/// stateless, so no directory lookup happens here.
pub struct Auth(pub SessionClaims);

impl Auth {
    pub fn claims(&self) -> &SessionClaims {
        &self.0
    }
    pub fn member(&self) -> drk_core::ID<Member> {
        self.0.member()
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let crypto = req.app_data::<web::Data<Crypto>>().cloned();
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_owned());
        Box::pin(async move {
            let header = auth_header.ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("missing authorization header")
            })?;
            let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("invalid authorization format")
            })?;
            let crypto = crypto.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("token service not configured")
            })?;
            match crypto.decode(token) {
                Ok(claims) => Ok(Auth(claims)),
                Err(AuthError::Expired) => {
                    Err(actix_web::error::ErrorUnauthorized("session expired"))
                }
                Err(_) => Err(actix_web::error::ErrorUnauthorized("invalid session")),
            }
        })
    }
}
