//! AES-256-CBC encryption and decryption with PKCS#7 padding.
//!
//! **Fixed zero IV.** Every message is encrypted under the same all-zero IV,
//! so identical plaintexts always produce identical ciphertexts and equal
//! prefixes are visible across messages. This is not a secure general-purpose
//! construction. It is kept because the server decrypts with the same fixed
//! key and IV; randomising the IV here would break every exchange with it.
//!
//! CBC has no authentication tag. Corruption is detected only through padding
//! validation and the UTF-8/JSON checks performed by the codec.

use aes::cipher::{
    block_padding::Pkcs7, generic_array::GenericArray, BlockDecryptMut, BlockEncryptMut,
    KeyIvInit,
};
use thiserror::Error;

use super::key::DerivedKey;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES block and of the CBC IV.
pub const BLOCK_LEN: usize = 16;

/// The IV used for every message.
pub const ZERO_IV: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The ciphertext is empty or not a whole number of blocks.
    #[error("ciphertext length {0} is not a positive multiple of {BLOCK_LEN}")]
    InvalidLength(usize),

    /// PKCS#7 validation failed after decryption.
    #[error("invalid padding")]
    Padding,
}

/// Encrypt `plaintext` under `key` with the fixed zero IV.
///
/// Infallible: the key length is fixed by type and PKCS#7 accepts any input
/// length, including zero.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Vec<u8> {
    encrypt_with_iv(key.as_bytes(), &ZERO_IV, plaintext)
}

/// Decrypt `ciphertext` under `key` with the fixed zero IV.
///
/// # Errors
///
/// Returns [`CipherError::InvalidLength`] if the input is not a positive
/// multiple of [`BLOCK_LEN`], and [`CipherError::Padding`] if the final block
/// does not unpad (wrong key, corruption, or tampering).
pub fn decrypt(key: &DerivedKey, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
    decrypt_with_iv(key.as_bytes(), &ZERO_IV, ciphertext)
}

fn encrypt_with_iv(key: &[u8; KEY_LEN], iv: &[u8; BLOCK_LEN], plaintext: &[u8]) -> Vec<u8> {
    Aes256CbcEnc::new(GenericArray::from_slice(key), GenericArray::from_slice(iv))
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

fn decrypt_with_iv(
    key: &[u8; KEY_LEN],
    iv: &[u8; BLOCK_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::InvalidLength(ciphertext.len()));
    }
    Aes256CbcDec::new(GenericArray::from_slice(key), GenericArray::from_slice(iv))
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::Padding)
}
