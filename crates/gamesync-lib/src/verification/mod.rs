pub mod content_digest_hasher;
mod integrity;

pub use content_digest_hasher::{ContentDigestVerifier, DigestParseError, Sha256Digest, VerificationError};
pub use integrity::{hash_file, needs_download};
