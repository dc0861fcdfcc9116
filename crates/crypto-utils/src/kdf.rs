use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::CryptoError;
use crate::zeroizing::SecretSeed;

/// Derives a 32-byte seed from `ikm` using HKDF-SHA256.
///
/// `info` is the domain-separation label; two callers using different labels
/// over the same key material get unrelated outputs. A `None` salt means the
/// RFC 5869 default (a block of zero bytes).
///
/// Empty key material is rejected rather than silently producing a constant.
pub fn hkdf_sha256_seed(
    ikm: &[u8],
    salt: Option<&[u8]>,
    info: &[u8],
) -> Result<SecretSeed, CryptoError> {
    if ikm.is_empty() {
        return Err(CryptoError::InvalidInput("empty key material".into()));
    }

    let hk = Hkdf::<Sha256>::new(salt, ikm);
    let mut okm = [0u8; 32];
    hk.expand(info, &mut okm)
        .map_err(|e| CryptoError::KdfFailed(format!("hkdf expand failed: {e}")))?;

    Ok(SecretSeed::new(okm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc5869_case_3_prefix() {
        // RFC 5869 test case 3: zero-length salt and info. The first 32 bytes
        // of the 42-byte OKM are T(1).
        let ikm = [0x0bu8; 22];
        let seed = hkdf_sha256_seed(&ikm, None, b"").unwrap();
        assert_eq!(
            hex::encode(seed.as_bytes()),
            "8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d"
        );
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let a = hkdf_sha256_seed(b"credential", None, b"label").unwrap();
        let b = hkdf_sha256_seed(b"credential", None, b"label").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn info_label_separates_domains() {
        let a = hkdf_sha256_seed(b"credential", None, b"label-a").unwrap();
        let b = hkdf_sha256_seed(b"credential", None, b"label-b").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn salt_changes_output() {
        let a = hkdf_sha256_seed(b"credential", Some(b"salt-1"), b"label").unwrap();
        let b = hkdf_sha256_seed(b"credential", Some(b"salt-2"), b"label").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn empty_ikm_rejected() {
        let err = hkdf_sha256_seed(b"", None, b"label").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }
}
