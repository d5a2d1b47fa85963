use solana_sdk::pubkey::Pubkey;

use crate::indexer::error::IndexerError;

pub trait Base58Conversions {
    fn to_base58(&self) -> String;
    fn from_base58(s: &str) -> Result<Self, IndexerError>
    where
        Self: Sized;
}

impl Base58Conversions for [u8; 32] {
    fn to_base58(&self) -> String {
        bs58::encode(self).into_string()
    }

    fn from_base58(s: &str) -> Result<Self, IndexerError> {
        decode_base58_to_fixed_array("hash", s)
    }
}

impl Base58Conversions for Pubkey {
    fn to_base58(&self) -> String {
        bs58::encode(self.as_ref()).into_string()
    }

    fn from_base58(s: &str) -> Result<Self, IndexerError> {
        decode_base58_to_fixed_array("pubkey", s).map(Pubkey::new_from_array)
    }
}

pub fn decode_base58_to_fixed_array<const N: usize>(
    field: &str,
    input: &str,
) -> Result<[u8; N], IndexerError> {
    let mut buffer = [0u8; N];
    let decoded_len = bs58::decode(input)
        .onto(&mut buffer)
        .map_err(|e| IndexerError::base58_decode_error(field, &e.to_string()))?;

    if decoded_len != N {
        return Err(IndexerError::base58_decode_error(
            field,
            &format!("expected {} bytes, got {}", N, decoded_len),
        ));
    }

    Ok(buffer)
}

pub fn decode_base58_to_pubkey(field: &str, input: &str) -> Result<Pubkey, IndexerError> {
    decode_base58_to_fixed_array(field, input).map(Pubkey::new_from_array)
}

pub fn decode_base58_option_to_pubkey(
    field: &str,
    value: &Option<String>,
) -> Result<Option<Pubkey>, IndexerError> {
    value
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| decode_base58_to_pubkey(field, s))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_wrong_length() {
        let short = bs58::encode([1u8; 16]).into_string();
        assert!(matches!(
            decode_base58_to_fixed_array::<32>("root", &short),
            Err(IndexerError::Base58Decode { .. })
        ));
        assert!(matches!(
            decode_base58_to_pubkey("owner", "0OIl"),
            Err(IndexerError::Base58Decode { .. })
        ));
    }

    #[test]
    fn test_pubkey_base58() {
        let key = Pubkey::new_unique();
        assert_eq!(key.to_base58(), key.to_string());
        assert_eq!(Pubkey::from_base58(&key.to_string()).unwrap(), key);
        assert_eq!(
            decode_base58_option_to_pubkey("delegate", &Some(String::new())).unwrap(),
            None
        );
    }
}
