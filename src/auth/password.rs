use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::auth::errors::CodecError;
use crate::config::HashConfig;

/// Argon2id password hashing with a tunable work factor.
#[derive(Debug, Clone)]
pub struct CredentialCodec {
    params: Params,
}

impl CredentialCodec {
    pub fn new(cfg: HashConfig) -> Result<Self, CodecError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| CodecError::Hash(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash with a fresh random salt. The result is the PHC string as bytes.
    pub fn hash(&self, plain: &str) -> Result<Vec<u8>, CodecError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                CodecError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash.into_bytes())
    }

    /// `Ok(false)` on mismatch. Errors only when the stored hash can't be parsed.
    ///
    /// The parameters embedded in the stored hash win over the configured
    /// ones, so raising the work factor doesn't invalidate existing users.
    pub fn verify(&self, plain: &str, stored: &[u8]) -> Result<bool, CodecError> {
        let encoded =
            std::str::from_utf8(stored).map_err(|e| CodecError::MalformedHash(e.to_string()))?;
        let parsed = PasswordHash::new(encoded).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            CodecError::MalformedHash(e.to_string())
        })?;
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
pub(crate) fn cheap_codec() -> CredentialCodec {
    CredentialCodec::new(HashConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("minimal argon2 params are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let codec = cheap_codec();
        let password = "Secur3P@ssw0rd!";
        let hash = codec.hash(password).expect("hashing should succeed");
        assert!(codec.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let codec = cheap_codec();
        let hash = codec.hash("correct-horse-battery-staple").unwrap();
        assert!(!codec.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let codec = cheap_codec();
        let a = codec.hash("Secr3t!").unwrap();
        let b = codec.hash("Secr3t!").unwrap();
        assert_ne!(a, b);
        assert!(codec.verify("Secr3t!", &a).unwrap());
        assert!(codec.verify("Secr3t!", &b).unwrap());
        assert!(!codec.verify("secr3t!", &a).unwrap());
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let codec = cheap_codec();
        let hash = codec.hash("plaintext-password").unwrap();
        let text = String::from_utf8(hash).unwrap();
        assert!(text.starts_with("$argon2id$"));
        assert!(!text.contains("plaintext-password"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let codec = cheap_codec();
        assert!(matches!(
            codec.verify("anything", b"not-a-valid-hash"),
            Err(CodecError::MalformedHash(_))
        ));
        assert!(matches!(
            codec.verify("anything", &[0xff, 0xfe]),
            Err(CodecError::MalformedHash(_))
        ));
    }

    #[test]
    fn hashes_from_other_work_factors_still_verify() {
        let weak = cheap_codec();
        let stronger = CredentialCodec::new(HashConfig {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = weak.hash("pw").unwrap();
        assert!(stronger.verify("pw", &hash).unwrap());
    }

    #[test]
    fn invalid_work_factor_is_rejected() {
        let err = CredentialCodec::new(HashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, CodecError::Hash(_)));
    }
}
