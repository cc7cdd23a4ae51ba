use std::collections::HashMap;

use serde::de::DeserializeOwned;
use snafu::ResultExt;
use time::{Duration, OffsetDateTime};

use crate::code_verifier::{CodeVerifier, VERIFIER_LENGTH};
use crate::error::{AuthError, PersistenceSnafu};
use crate::state_token::StateToken;
use crate::token::TokenData;

/// Storage key for the code verifier of the in-flight attempt.
pub const KEY_CODE_VERIFIER: &str = "code_verifier";

/// Storage key for the anti-CSRF state of the in-flight attempt.
pub const KEY_STATE: &str = "state";

/// Storage key for the persisted access token record.
pub const KEY_ACCESS_TOKEN: &str = "spotify_access_token";

/// Scoped key/value persistence surviving a full page navigation.
///
/// The authorization flow navigates away from the application to the
/// provider's login page and is redirected back, tearing down the calling
/// context. Anything not written through this trait before the redirect is
/// lost. Implementations need no concurrency control: only one authorization
/// attempt is ever in flight.
pub trait SessionStore {
    fn put(&mut self, key: &str, value: String);
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&mut self, key: &str) -> Option<String>;
}

/// In-memory [`SessionStore`]. Suitable for tests and for hosts that keep the
/// process alive across the redirect (e.g. a desktop shell with an embedded
/// login view).
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

/// The {verifier, state} tuple carried across the redirect boundary.
///
/// Exactly one such tuple is live at a time: [`AuthSession::persist`]
/// overwrites any orphaned previous attempt, [`AuthSession::take`] consumes
/// the live one.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AuthSession {
    pub(crate) code_verifier: CodeVerifier<VERIFIER_LENGTH>,
    pub(crate) state: StateToken,
    pub(crate) issued_at: OffsetDateTime,
}

/// Persisted form of the `state` entry. Carries the attempt's timestamp so
/// that stale callbacks can be rejected without an extra storage key.
#[derive(serde::Serialize, serde::Deserialize)]
struct StoredState {
    state: StateToken,
    #[serde(with = "time::serde::rfc3339")]
    issued_at: OffsetDateTime,
}

impl AuthSession {
    pub(crate) fn generate() -> Self {
        Self {
            code_verifier: CodeVerifier::generate(),
            state: StateToken::new(),
            issued_at: OffsetDateTime::now_utc(),
        }
    }

    /// Write the attempt into the store. Must happen before navigating to the
    /// authorization URL.
    pub(crate) fn persist<S: SessionStore>(&self, store: &mut S) -> Result<(), AuthError> {
        store.put(
            KEY_CODE_VERIFIER,
            serde_json::to_string(&self.code_verifier).context(PersistenceSnafu)?,
        );
        store.put(
            KEY_STATE,
            serde_json::to_string(&StoredState {
                state: self.state.clone(),
                issued_at: self.issued_at,
            })
            .context(PersistenceSnafu)?,
        );
        Ok(())
    }

    /// Read and remove the stored attempt in one step.
    ///
    /// Both entries are removed even when one of them is missing or no longer
    /// decodes, so a second call (a replayed callback, a double-fired effect)
    /// always comes up empty.
    pub(crate) fn take<S: SessionStore>(store: &mut S) -> Option<Self> {
        let raw_verifier = store.remove(KEY_CODE_VERIFIER);
        let raw_state = store.remove(KEY_STATE);

        let code_verifier =
            decode_or_drop::<CodeVerifier<VERIFIER_LENGTH>>(KEY_CODE_VERIFIER, raw_verifier?)?;
        let stored_state = decode_or_drop::<StoredState>(KEY_STATE, raw_state?)?;

        Some(Self {
            code_verifier,
            state: stored_state.state,
            issued_at: stored_state.issued_at,
        })
    }

    pub(crate) fn age(&self) -> Duration {
        OffsetDateTime::now_utc() - self.issued_at
    }
}

/// Persist the access token record obtained from a successful exchange.
pub(crate) fn store_access_token<S: SessionStore>(
    store: &mut S,
    token: &TokenData,
) -> Result<(), AuthError> {
    store.put(
        KEY_ACCESS_TOKEN,
        serde_json::to_string(token).context(PersistenceSnafu)?,
    );
    Ok(())
}

/// The persisted access token record, if any.
///
/// A record that no longer decodes (e.g. after a data format change) is
/// removed and treated as absent.
pub fn stored_access_token<S: SessionStore>(store: &mut S) -> Option<TokenData> {
    let raw = store.get(KEY_ACCESS_TOKEN)?;
    match serde_json::from_str(&raw) {
        Ok(token) => Some(token),
        Err(err) => {
            tracing::warn!(
                ?err,
                "Data format of '{KEY_ACCESS_TOKEN}' changed. Removing the previously persisted value."
            );
            store.remove(KEY_ACCESS_TOKEN);
            None
        }
    }
}

fn decode_or_drop<T: DeserializeOwned>(key: &str, raw: String) -> Option<T> {
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                ?err,
                "Could not decode persisted value of '{key}'. Treating the attempt as absent."
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertr::prelude::*;

    #[test]
    fn memory_store_put_get_remove() {
        let mut store = MemorySessionStore::default();
        assert_that(store.get("a").is_none()).is_true();

        store.put("a", "1".to_owned());
        assert_that(store.get("a").unwrap()).is_equal_to("1".to_owned());

        store.put("a", "2".to_owned());
        assert_that(store.get("a").unwrap()).is_equal_to("2".to_owned());

        assert_that(store.remove("a").unwrap()).is_equal_to("2".to_owned());
        assert_that(store.get("a").is_none()).is_true();
    }

    #[test]
    fn persisted_session_is_taken_exactly_once() {
        let mut store = MemorySessionStore::default();
        let session = AuthSession::generate();
        session.persist(&mut store).unwrap();

        let taken = AuthSession::take(&mut store).unwrap();
        assert_that(taken).is_equal_to(session);

        assert_that(AuthSession::take(&mut store).is_none()).is_true();
        assert_that(store.get(KEY_CODE_VERIFIER).is_none()).is_true();
        assert_that(store.get(KEY_STATE).is_none()).is_true();
    }

    #[test]
    fn persisting_overwrites_an_orphaned_attempt() {
        let mut store = MemorySessionStore::default();
        let orphaned = AuthSession::generate();
        orphaned.persist(&mut store).unwrap();

        let fresh = AuthSession::generate();
        fresh.persist(&mut store).unwrap();

        let taken = AuthSession::take(&mut store).unwrap();
        assert_that(taken.state.as_str()).is_not_equal_to(orphaned.state.as_str());
        assert_that(taken).is_equal_to(fresh);
    }

    #[test]
    fn take_clears_both_entries_on_undecodable_data() {
        let mut store = MemorySessionStore::default();
        AuthSession::generate().persist(&mut store).unwrap();
        store.put(KEY_STATE, "not json".to_owned());

        assert_that(AuthSession::take(&mut store).is_none()).is_true();
        assert_that(store.get(KEY_CODE_VERIFIER).is_none()).is_true();
        assert_that(store.get(KEY_STATE).is_none()).is_true();
    }

    #[test]
    fn undecodable_token_record_is_dropped() {
        let mut store = MemorySessionStore::default();
        store.put(KEY_ACCESS_TOKEN, "not json".to_owned());

        assert_that(stored_access_token(&mut store).is_none()).is_true();
        assert_that(store.get(KEY_ACCESS_TOKEN).is_none()).is_true();
    }
}
