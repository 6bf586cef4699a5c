//! AES-256-GCM codec for session cache values at rest.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use campora_application::ValueCodec;
use campora_core::{AppError, AppResult};

/// AES-256-GCM codec protecting cached session values.
///
/// The key is supplied by the embedding application, typically from a
/// platform keychain, and is never a compiled-in constant. Output is
/// base64 so the vault only ever handles printable strings.
#[derive(Clone)]
pub struct AesValueCodec {
    cipher: Aes256Gcm,
}

impl AesValueCodec {
    /// Creates a codec from a 32-byte key.
    pub fn new(key_bytes: &[u8; 32]) -> Self {
        let cipher = Aes256Gcm::new(key_bytes.into());
        Self { cipher }
    }

    /// Creates a codec from a hex-encoded 32-byte key.
    pub fn from_hex(hex_key: &str) -> AppResult<Self> {
        let decoded = hex::decode(hex_key)
            .map_err(|error| AppError::Validation(format!("invalid session key hex: {error}")))?;

        if decoded.len() != 32 {
            return Err(AppError::Validation(
                "session key must be exactly 32 bytes (64 hex chars)".to_owned(),
            ));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded);
        Ok(Self::new(&key))
    }
}

impl ValueCodec for AesValueCodec {
    fn encode(&self, plaintext: &str) -> AppResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|error| AppError::Codec(format!("failed to encrypt value: {error}")))?;

        // Prepend the 12-byte nonce to the ciphertext for storage.
        let mut combined = Vec::with_capacity(nonce.len() + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    fn decode(&self, encoded: &str) -> AppResult<String> {
        let combined = STANDARD
            .decode(encoded)
            .map_err(|error| AppError::Codec(format!("stored value is not base64: {error}")))?;

        if combined.len() < 12 {
            return Err(AppError::Codec(
                "stored value too short: missing nonce".to_owned(),
            ));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(12);
        let nonce_array: [u8; 12] = nonce_bytes
            .try_into()
            .map_err(|_| AppError::Codec("nonce must be exactly 12 bytes".to_owned()))?;
        let nonce = Nonce::from(nonce_array);

        let plaintext = self
            .cipher
            .decrypt(&nonce, ciphertext)
            .map_err(|error| AppError::Codec(format!("failed to decrypt value: {error}")))?;

        String::from_utf8(plaintext)
            .map_err(|error| AppError::Codec(format!("decrypted value is not UTF-8: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use campora_application::ValueCodec;
    use campora_core::AppResult;
    use proptest::prelude::*;

    use super::AesValueCodec;

    fn codec() -> AesValueCodec {
        AesValueCodec::new(&[42u8; 32])
    }

    #[test]
    fn encode_decode_roundtrip() -> AppResult<()> {
        let codec = codec();

        for plaintext in ["", "token-value", "বাংলা ইউনিকোড", "{\"id\": 1}"] {
            let encoded = codec.encode(plaintext)?;
            assert_ne!(encoded, plaintext);
            assert_eq!(codec.decode(&encoded)?, plaintext);
        }

        Ok(())
    }

    #[test]
    fn decode_with_wrong_key_fails() -> AppResult<()> {
        let encoded = AesValueCodec::new(&[42u8; 32]).encode("secret")?;
        let other = AesValueCodec::new(&[99u8; 32]);
        assert!(other.decode(&encoded).is_err());
        Ok(())
    }

    #[test]
    fn decode_of_non_ciphertext_is_an_error_not_a_panic() {
        let codec = codec();
        assert!(codec.decode("not base64 at all!").is_err());
        assert!(codec.decode("aGVsbG8=").is_err());
        assert!(codec.decode("").is_err());
    }

    #[test]
    fn from_hex_validates_key_length() {
        assert!(AesValueCodec::from_hex("2a".repeat(32).as_str()).is_ok());
        assert!(AesValueCodec::from_hex("2a2a").is_err());
        assert!(AesValueCodec::from_hex("not-hex").is_err());
    }

    #[test]
    fn encoding_is_randomized_per_call() -> AppResult<()> {
        let codec = codec();
        let first = codec.encode("same input")?;
        let second = codec.encode("same input")?;
        assert_ne!(first, second);
        Ok(())
    }

    proptest! {
        #[test]
        fn roundtrip_recovers_every_string(plaintext in ".*") {
            let codec = codec();
            let encoded = codec.encode(&plaintext).unwrap_or_else(|_| panic!("test"));
            let decoded = codec.decode(&encoded).unwrap_or_else(|_| panic!("test"));
            prop_assert_eq!(decoded, plaintext);
        }

        #[test]
        fn decoding_arbitrary_input_is_an_error_not_a_panic(input in ".*") {
            prop_assert!(codec().decode(&input).is_err());
        }
    }
}
