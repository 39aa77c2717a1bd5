use drk_core::ID;
use drk_core::Unique;

/// A registered player in the user directory, keyed by their Telegram
/// identity. Upserted on every successful handshake.
#[derive(Debug, Clone)]
pub struct Member {
    id: ID<Self>,
    external_id: i64,
    first_name: String,
    username: Option<String>,
    language_code: Option<String>,
}

impl Unique for Member {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Member {
    pub fn new(
        id: ID<Self>,
        external_id: i64,
        first_name: String,
        username: Option<String>,
        language_code: Option<String>,
    ) -> Self {
        Self {
            id,
            external_id,
            first_name,
            username,
            language_code,
        }
    }
    pub fn external_id(&self) -> i64 {
        self.external_id
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
    /// Name shown in lobbies: the Telegram handle when set, else first name.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}
