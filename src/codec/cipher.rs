// AES-128-CBC codec matching the device firmware: base64 on the wire, fixed
// pre-shared key and IV, zero-padded plaintext.
//
// The IV is reused for every message. The firmware does the same, so this
// must stay byte-compatible with it.

use aes::cipher::{generic_array::GenericArray, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use anyhow::bail;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::CipherConfig;
use crate::error::DecryptionError;

pub const BLOCK_SIZE: usize = 16;
pub const KEY_SIZE: usize = 16;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

#[derive(Clone)]
pub struct CipherCodec {
    key: [u8; KEY_SIZE],
    iv: [u8; BLOCK_SIZE],
}

impl std::fmt::Debug for CipherCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherCodec").finish_non_exhaustive()
    }
}

impl CipherCodec {
    pub fn new(key: [u8; KEY_SIZE], iv: [u8; BLOCK_SIZE]) -> Self {
        Self { key, iv }
    }

    pub fn from_config(cfg: &CipherConfig) -> anyhow::Result<Self> {
        let key = fixed_bytes("cipher key", &cfg.key)?;
        let iv = fixed_bytes("cipher iv", &cfg.iv)?;
        Ok(Self::new(key, iv))
    }

    /// Decrypt a base64 ciphertext body into its plaintext, with the sender's
    /// trailing NUL padding removed.
    pub fn decrypt(&self, body: &[u8]) -> Result<String, DecryptionError> {
        let mut buf = STANDARD.decode(body.trim_ascii())?;
        if buf.is_empty() || buf.len() % BLOCK_SIZE != 0 {
            return Err(DecryptionError::BlockLength(buf.len()));
        }

        let mut dec = Aes128CbcDec::new(&self.key.into(), &self.iv.into());
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            dec.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }

        while buf.last() == Some(&0) {
            buf.pop();
        }
        Ok(String::from_utf8(buf)?)
    }

    /// Encrypt the way a device does: zero-pad to the block size (an empty
    /// message still takes one block), encrypt, base64-encode.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut buf = plaintext.as_bytes().to_vec();
        let padded_len = buf.len().div_ceil(BLOCK_SIZE).max(1) * BLOCK_SIZE;
        buf.resize(padded_len, 0);

        let mut enc = Aes128CbcEnc::new(&self.key.into(), &self.iv.into());
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        STANDARD.encode(&buf)
    }
}

fn fixed_bytes(what: &str, value: &str) -> anyhow::Result<[u8; 16]> {
    match <[u8; 16]>::try_from(value.as_bytes()) {
        Ok(bytes) => Ok(bytes),
        Err(_) => bail!("{what} must be exactly 16 bytes, got {}", value.len()),
    }
}
