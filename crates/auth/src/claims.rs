use super::*;
use drk_core::ID;
use drk_core::SESSION_TTL;

/// Session token payload: who, when minted, when it dies.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionClaims {
    pub sub: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(member: ID<Member>) -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_secs() as i64;
        Self {
            sub: member.uuid(),
            iat: now,
            exp: now + SESSION_TTL.as_secs() as i64,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp
            < std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time")
                .as_secs() as i64
    }
    pub fn member(&self) -> ID<Member> {
        ID::from(self.sub)
    }
}
