//! The `hex(iv):hex(ciphertext)` wire form.

use std::fmt;
use std::str::FromStr;

use super::error::CipherError;

/// AES block / CBC IV length.
pub const IV_LEN: usize = 16;

/// An IV and the ciphertext it produced. Meaningless without the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// Per-encryption IV.
    pub iv: [u8; IV_LEN],
    /// PKCS#7-padded AES-256-CBC ciphertext.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncryptedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for EncryptedBlob {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_hex, data_hex) = s
            .split_once(':')
            .ok_or_else(|| CipherError::Format("missing ':' separator".to_string()))?;
        if iv_hex.is_empty() || data_hex.is_empty() {
            return Err(CipherError::Format("empty IV or ciphertext".to_string()));
        }

        let iv = hex::decode(iv_hex).map_err(|e| CipherError::Format(format!("IV: {e}")))?;
        let iv: [u8; IV_LEN] = iv.try_into().map_err(|v: Vec<u8>| {
            CipherError::Format(format!("IV must be {IV_LEN} bytes, got {}", v.len()))
        })?;
        let ciphertext =
            hex::decode(data_hex).map_err(|e| CipherError::Format(format!("ciphertext: {e}")))?;

        Ok(Self { iv, ciphertext })
    }
}

/// Cheap structural pre-check: `^[a-fA-F0-9]{32}:[a-fA-F0-9]+$`.
///
/// Says nothing about integrity. CBC carries no authentication tag, so a
/// value that passes may still be forged or corrupted.
pub fn is_valid_encrypted_string(input: &str) -> bool {
    let Some((iv, data)) = input.split_once(':') else {
        return false;
    };
    iv.len() == IV_LEN * 2
        && !data.is_empty()
        && iv.bytes().chain(data.bytes()).all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let blob = EncryptedBlob {
            iv: [0x01; IV_LEN],
            ciphertext: vec![0xAB, 0xCD],
        };
        let text = blob.to_string();
        assert_eq!(text, format!("{}:abcd", "01".repeat(16)));
        assert_eq!(text.parse::<EncryptedBlob>().unwrap(), blob);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in [
            "",
            "abcd",
            ":abcd",
            format!("{}:", "00".repeat(16)).as_str(),
            format!("{}:abcd", "00".repeat(8)).as_str(),
            format!("{}:xyz", "00".repeat(16)).as_str(),
        ] {
            assert!(
                matches!(bad.parse::<EncryptedBlob>(), Err(CipherError::Format(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_structural_precheck() {
        let iv = "0a".repeat(16);
        assert!(is_valid_encrypted_string(&format!("{iv}:ff")));
        assert!(is_valid_encrypted_string(&format!("{}:FF", iv.to_uppercase())));
        assert!(!is_valid_encrypted_string(&format!("{iv}:")));
        assert!(!is_valid_encrypted_string(&format!("{iv}ff")));
        assert!(!is_valid_encrypted_string(&format!("{}:ff", "0a".repeat(15))));
        assert!(!is_valid_encrypted_string(&format!("{iv}:fg")));
    }
}
