//! # Account Identity
//!
//! Network accounts are addressed by a fixed-width strkey: 56 base32 characters
//! that decode to 35 bytes.
//!
//! ```text
//! ┌─────────┬──────────────────────────────┬──────────────┐
//! │ version │     ed25519 public key       │   CRC16      │
//! │ 1 byte  │         32 bytes             │ 2 bytes (LE) │
//! └─────────┴──────────────────────────────┴──────────────┘
//! ```
//!
//! The account version byte is `6 << 3`, which always renders as a leading `G`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Encoded length of an account strkey.
pub const ACCOUNT_ID_LEN: usize = 56;

/// Version byte for ed25519 public keys.
const VERSION_ACCOUNT_ID: u8 = 6 << 3;

/// Decoded payload length: version + key + checksum.
const DECODED_LEN: usize = 1 + 32 + 2;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// A well-formed account identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Wrap a raw ed25519 public key.
    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the strkey form.
    pub fn address(&self) -> String {
        let mut raw = Vec::with_capacity(DECODED_LEN);
        raw.push(VERSION_ACCOUNT_ID);
        raw.extend_from_slice(&self.0);
        let checksum = crc16_xmodem(&raw);
        raw.extend_from_slice(&checksum.to_le_bytes());
        base32_encode(&raw)
    }
}

/// Why an account strkey was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    #[error("expected 56 characters, got {0}")]
    InvalidLength(usize),
    #[error("invalid base32 character {0:?}")]
    InvalidCharacter(char),
    #[error("invalid version byte 0x{0:02x}")]
    InvalidVersion(u8),
    #[error("checksum mismatch")]
    InvalidChecksum,
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ACCOUNT_ID_LEN {
            return Err(AccountIdError::InvalidLength(s.len()));
        }

        let raw = base32_decode(s)?;
        if raw.len() != DECODED_LEN {
            return Err(AccountIdError::InvalidLength(s.len()));
        }

        let (body, checksum) = raw.split_at(DECODED_LEN - 2);
        if body[0] != VERSION_ACCOUNT_ID {
            return Err(AccountIdError::InvalidVersion(body[0]));
        }

        let expected = crc16_xmodem(body).to_le_bytes();
        if checksum != expected {
            return Err(AccountIdError::InvalidChecksum);
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&body[1..]);
        Ok(Self(key))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.address())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AccountId::from_str(&s).map_err(de::Error::custom)
    }
}

/// CRC16-XModem (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for &byte in data {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

fn base32_decode(s: &str) -> Result<Vec<u8>, AccountIdError> {
    let mut out = Vec::with_capacity(s.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for c in s.chars() {
        let value = match c {
            'A'..='Z' => c as u32 - 'A' as u32,
            '2'..='7' => c as u32 - '2' as u32 + 26,
            other => return Err(AccountIdError::InvalidCharacter(other)),
        };
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xff) as u8);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "GAN4WOTCFSASG3J6SGLLQZURDDUVNBQANAHEQJ3PBNDZ74X63UZWQPZW";

    #[test]
    fn test_zero_key_address() {
        let account = AccountId::from_bytes([0u8; 32]);
        assert_eq!(
            account.address(),
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
        );
    }

    #[test]
    fn test_parse_valid_address() {
        let account = AccountId::from_str(VALID).unwrap();
        assert_eq!(account.to_string(), VALID);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let result = AccountId::from_str("FON4WOTCFSASG3J6SGLLQZURDDUVNBQANAHEQJ3PBNDZ74X63UZWQPZW");
        assert!(matches!(result, Err(AccountIdError::InvalidVersion(_))));
    }

    #[test]
    fn test_checksum_rejected() {
        let mut tampered = VALID.to_string();
        tampered.replace_range(10..11, "B");
        assert!(AccountId::from_str(&tampered).is_err());
    }

    #[test]
    fn test_length_and_alphabet() {
        assert_eq!(
            AccountId::from_str("GABC"),
            Err(AccountIdError::InvalidLength(4))
        );
        let lowercase = VALID.to_lowercase();
        assert!(matches!(
            AccountId::from_str(&lowercase),
            Err(AccountIdError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let account = AccountId::from_bytes([7u8; 32]);
        let json = serde_json::to_string(&account).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }
}
