/// Unpredictable token binding an authorization request to its callback.
///
/// Sent as the `state` query parameter and compared against the value the
/// identity provider echoes back. Deliberately not derived from any
/// observable client state (no counters, no timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StateToken {
    state: String,
}

impl StateToken {
    /// Draw 32 bytes from the CSPRNG and encode them base64 url safe,
    /// yielding a 43 character opaque string.
    pub fn new() -> Self {
        use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
        use rand::Rng;

        let bytes: [u8; 32] = rand::rng().random();

        Self {
            state: URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.state
    }
}

impl Default for StateToken {
    fn default() -> Self {
        Self::new()
    }
}
