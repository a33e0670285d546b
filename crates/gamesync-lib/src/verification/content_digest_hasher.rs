use digest::Digest;
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};

pub const SHA256_DIGEST_LEN: usize = 32;

/// Runs CPU-bound hashing via `block_in_place` so sibling tasks keep being
/// polled. Falls back to running inline where `block_in_place` would panic.
pub(crate) fn hash_in_place<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Verification failed: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    VerificationFailed { expected: Vec<u8>, actual: Vec<u8> },
}

#[derive(Error, Debug, PartialEq)]
pub enum DigestParseError {
    #[error("digest is empty")]
    Empty,

    #[error("digest is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("digest has {0} bytes, expected 32")]
    InvalidLength(usize),
}

/// A SHA-256 content digest. Displays as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; SHA256_DIGEST_LEN]);

impl Sha256Digest {
    /// Parses a hex digest. Upper and lower case are both accepted.
    pub fn from_hex(hex_digest: &str) -> Result<Self, DigestParseError> {
        let hex_digest = hex_digest.trim();
        if hex_digest.is_empty() {
            return Err(DigestParseError::Empty);
        }
        let bytes = hex::decode(hex_digest)?;
        let bytes: [u8; SHA256_DIGEST_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| DigestParseError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn of(data: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha256::new();
        Digest::update(&mut hasher, data.as_ref());
        Self::from_hasher(hasher)
    }

    pub(crate) fn from_hasher(hasher: Sha256) -> Self {
        let mut bytes = [0u8; SHA256_DIGEST_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Sha256Digest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256Digest({})", self.to_hex())
    }
}

/// Incrementally hashes streamed content and compares it with an expected digest.
pub struct ContentDigestVerifier {
    hasher: Sha256,
    expected_digest: Sha256Digest,
}

impl ContentDigestVerifier {
    #[inline]
    pub fn new(expected_digest: Sha256Digest) -> Self {
        Self {
            hasher: Sha256::new(),
            expected_digest,
        }
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        hash_in_place(|| Digest::update(&mut self.hasher, data));
    }

    pub fn verify(self) -> Result<(), VerificationError> {
        let actual_digest = Sha256Digest::from_hasher(self.hasher);

        if actual_digest == self.expected_digest {
            Ok(())
        } else {
            Err(VerificationError::VerificationFailed {
                expected: self.expected_digest.as_bytes().to_vec(),
                actual: actual_digest.as_bytes().to_vec(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_digest_of_empty_input() {
        assert_eq!(Sha256Digest::of(b"").to_hex(), EMPTY_SHA256);
    }

    #[test]
    fn test_from_hex_is_case_insensitive() {
        let lower = Sha256Digest::from_hex(EMPTY_SHA256).unwrap();
        let upper = Sha256Digest::from_hex(&EMPTY_SHA256.to_uppercase()).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_string(), EMPTY_SHA256);
    }

    #[test]
    fn test_from_hex_rejects_malformed_digests() {
        assert_eq!(Sha256Digest::from_hex(""), Err(DigestParseError::Empty));
        assert_eq!(
            Sha256Digest::from_hex("abcd"),
            Err(DigestParseError::InvalidLength(2))
        );
        assert_eq!(
            Sha256Digest::from_hex(&"zz".repeat(32)),
            Err(DigestParseError::InvalidHex(
                hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 }
            ))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_verifier_on_multi_thread_runtime() {
        let expected = Sha256Digest::of(b"hello world");
        let mut verifier = ContentDigestVerifier::new(expected);
        verifier.update(b"hello ");
        verifier.update(b"world");
        assert!(verifier.verify().is_ok());
    }

    #[test]
    fn test_verifier_accepts_chunked_content() {
        let expected = Sha256Digest::of(b"hello world");
        let mut verifier = ContentDigestVerifier::new(expected);
        verifier.update(b"hello ");
        verifier.update(b"world");
        assert!(verifier.verify().is_ok());
    }

    #[test]
    fn test_verifier_reports_mismatch() {
        let expected = Sha256Digest::of(b"hello world");
        let mut verifier = ContentDigestVerifier::new(expected);
        verifier.update(b"goodbye");
        let err = verifier.verify().unwrap_err();
        assert!(err.to_string().contains(&expected.to_hex()));
    }
}
