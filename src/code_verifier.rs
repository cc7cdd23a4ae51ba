/// Length of the code verifiers generated for authorization attempts.
pub(crate) const VERIFIER_LENGTH: usize = 128;

/// The client-held PKCE secret.
///
/// see: https://datatracker.ietf.org/doc/html/rfc7636
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CodeVerifier<const LENGTH: usize> {
    code_verifier: String,
}

impl<const LENGTH: usize> CodeVerifier<LENGTH> {
    /// Generate a fresh verifier from the OS-seeded CSPRNG.
    ///
    /// `rand::rng()` panics when no secure randomness is available. There is
    /// no fallback to a weaker source.
    pub(crate) fn generate() -> Self {
        use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
        use rand::Rng;

        if LENGTH < 43 || LENGTH > 128 {
            panic!("Invalid code verifier length");
        }

        // Leveraging the base64 encoding ratio of encoding 3 bytes into 4
        // characters with the fact that we use the NO_PAD config.
        let mut bytes = vec![0u8; (LENGTH * 3) / 4];
        rand::rng().fill(bytes.as_mut_slice());

        let code_verifier = URL_SAFE_NO_PAD.encode(&bytes);

        assert_eq!(code_verifier.len(), LENGTH);

        Self { code_verifier }
    }

    /// Derive the challenge sent in place of the verifier during
    /// authorization. Deterministic: the provider re-derives the same value
    /// from the verifier we later send to the token endpoint.
    pub(crate) fn to_code_challenge(&self) -> CodeChallenge {
        use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
        use sha2::Digest;

        let mut hasher = sha2::Sha256::new();
        hasher.update(self.code_verifier.as_bytes());
        let digest = hasher.finalize();

        let code_challenge = URL_SAFE_NO_PAD.encode(digest);

        CodeChallenge {
            code_challenge,
            code_challenge_method: CodeChallengeMethod::S256,
        }
    }

    pub fn code_verifier(&self) -> &str {
        self.code_verifier.as_str()
    }

    #[cfg(test)]
    pub(crate) fn from_raw(code_verifier: impl Into<String>) -> Self {
        Self {
            code_verifier: code_verifier.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChallengeMethod {
    S256,
}

impl CodeChallengeMethod {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            CodeChallengeMethod::S256 => "S256",
        }
    }
}

/// One-way transformation of a [`CodeVerifier`]. Never stored; computed right
/// before the authorization URL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge {
    code_challenge: String,
    code_challenge_method: CodeChallengeMethod,
}

impl CodeChallenge {
    pub fn code_challenge(&self) -> &str {
        self.code_challenge.as_str()
    }

    pub fn code_challenge_method(&self) -> CodeChallengeMethod {
        self.code_challenge_method
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeChallengeMethod, CodeVerifier};
    use assertr::prelude::*;

    #[test]
    fn test_43() {
        let verifier = CodeVerifier::<43>::generate();
        assert_that(verifier.code_verifier()).has_length(43);

        let challenge = verifier.to_code_challenge();
        assert_that(challenge.code_challenge_method()).is_equal_to(CodeChallengeMethod::S256);
        assert_that(challenge.code_challenge()).has_length(43);
    }

    #[test]
    fn test_128() {
        let verifier = CodeVerifier::<128>::generate();
        assert_that(verifier.code_verifier()).has_length(128);

        let challenge = verifier.to_code_challenge();
        assert_that(challenge.code_challenge_method()).is_equal_to(CodeChallengeMethod::S256);
        assert_that(challenge.code_challenge()).has_length(43);
    }

    #[test]
    fn verifier_and_challenge_are_url_safe() {
        let verifier = CodeVerifier::<128>::generate();
        let challenge = verifier.to_code_challenge();

        for value in [verifier.code_verifier(), challenge.code_challenge()] {
            assert_that(value.contains('+')).is_false();
            assert_that(value.contains('/')).is_false();
            assert_that(value.contains('=')).is_false();
        }
    }

    #[test]
    fn challenge_derivation_is_deterministic() {
        let verifier = CodeVerifier::<128>::generate();
        let first = verifier.to_code_challenge();
        let second = verifier.to_code_challenge();
        assert_that(first).is_equal_to(second);
    }

    #[test]
    fn challenge_matches_rfc_7636_appendix_b() {
        let verifier =
            CodeVerifier::<43>::from_raw("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        let challenge = verifier.to_code_challenge();
        assert_that(challenge.code_challenge())
            .is_equal_to("E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }
}
