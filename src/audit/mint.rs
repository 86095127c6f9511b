//! Mint-account decoder.
//!
//! Decodes the fixed 82-byte SPL mint layout into a [`TokenDescriptor`].
//! Accounts longer than 82 bytes (extension-bearing) are accepted, but only
//! the first 82 bytes are interpreted; that matches the reference layout and
//! is a documented format limitation.

use crate::errors::AuditError;
use crate::types::TokenDescriptor;
use solana_sdk::pubkey::Pubkey as SolanaPubkey;

/// Minimum byte length of a decodable mint account.
pub const MINT_ACCOUNT_LEN: usize = 82;

/// Decode raw mint-account bytes. Pure; fails only when the input is shorter
/// than [`MINT_ACCOUNT_LEN`].
///
/// Layout:
/// - [0:4)   mint-authority discriminant, u32 LE; `1` means a key follows
/// - [4:36)  mint-authority pubkey
/// - [36:44) raw supply as two LE u32 words, low then high
/// - [44]    decimals
/// - [46:50) freeze-authority discriminant
/// - [50:82) freeze-authority pubkey
pub fn decode_mint_account(address: &str, data: &[u8]) -> Result<TokenDescriptor, AuditError> {
    if data.len() < MINT_ACCOUNT_LEN {
        return Err(AuditError::MalformedAccount {
            address: address.to_string(),
            reason: format!("{} bytes, need at least {}", data.len(), MINT_ACCOUNT_LEN),
        });
    }

    let mint_authority = read_optional_pubkey(&data[0..4], &data[4..36]);

    // The reference layout stores supply as two 32-bit words; combining them
    // explicitly keeps byte-for-byte compatibility with it, so this is never
    // a single u64 read.
    let low = u32::from_le_bytes([data[36], data[37], data[38], data[39]]);
    let high = u32::from_le_bytes([data[40], data[41], data[42], data[43]]);
    let supply = ((high as u64) << 32) | low as u64;

    let decimals = data[44];
    let freeze_authority = read_optional_pubkey(&data[46..50], &data[50..82]);

    Ok(TokenDescriptor {
        address: address.to_string(),
        decimals,
        supply,
        mint_authority,
        freeze_authority,
    })
}

/// COption-style read: the key is valid only when the discriminant word is
/// exactly `1`; any other value means the authority is revoked.
fn read_optional_pubkey(discriminant: &[u8], key: &[u8]) -> Option<String> {
    let tag = u32::from_le_bytes([
        discriminant[0],
        discriminant[1],
        discriminant[2],
        discriminant[3],
    ]);
    if tag != 1 {
        return None;
    }
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(key);
    Some(SolanaPubkey::new_from_array(bytes).to_string())
}
