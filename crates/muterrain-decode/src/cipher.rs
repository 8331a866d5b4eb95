//! Rolling-key stream cipher and attribute mask.
//!
//! Every terrain file on disk is passed through the same byte-wise cipher.
//! Each output byte depends on a 16-byte XOR table indexed by stream
//! position and on a rolling key derived from the previous *encrypted*
//! byte:
//!
//! ```text
//! plain[i]  = ((raw[i] ^ KEY_TABLE[i % 16]) - key) mod 256
//! key_next  = (raw[i] + 0x3D) mod 256
//! ```
//!
//! Attribute files are additionally XOR-masked with a 3-byte table after
//! decryption (see [`apply_attribute_mask`]).

/// Fixed XOR table indexed by stream position modulo 16.
pub const KEY_TABLE: [u8; 16] = [
    0xD1, 0x73, 0x52, 0xF6, 0xD2, 0x9A, 0xCB, 0x27, 0x3E, 0xAF, 0x59, 0x31, 0x37, 0xB3, 0xE7, 0xA2,
];

/// Rolling key value at the start of every stream.
pub const INITIAL_KEY: u8 = 0x5E;

/// Added to each encrypted byte to produce the next rolling key.
const KEY_STEP: u8 = 0x3D;

/// XOR table for the secondary attribute mask, indexed by position modulo 3.
pub const ATTRIBUTE_MASK: [u8; 3] = [0xFC, 0xCF, 0xAB];

/// Incremental decryptor for a single stream.
///
/// The rolling key and stream position live in this value rather than in
/// any shared state, so independent streams can be decrypted concurrently.
/// Feeding a file through [`StreamDecryptor::update`] in arbitrary chunks
/// produces the same bytes as a single call to [`decrypt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDecryptor {
    key: u8,
    position: usize,
}

impl StreamDecryptor {
    /// Create a decryptor positioned at the start of a stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: INITIAL_KEY,
            position: 0,
        }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Decrypt a chunk in place, advancing the stream state.
    pub fn update(&mut self, chunk: &mut [u8]) {
        for byte in chunk.iter_mut() {
            let raw = *byte;
            *byte = (raw ^ KEY_TABLE[self.position % KEY_TABLE.len()]).wrapping_sub(self.key);
            // The next key comes from the encrypted byte, not the output.
            self.key = raw.wrapping_add(KEY_STEP);
            self.position += 1;
        }
    }
}

impl Default for StreamDecryptor {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrypt a complete file buffer.
///
/// Total over any input: the output always has the same length.
#[must_use]
pub fn decrypt(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    StreamDecryptor::new().update(&mut out);
    out
}

/// Encrypt a buffer so that [`decrypt`] returns it unchanged.
#[must_use]
pub fn encrypt(data: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    data.iter()
        .enumerate()
        .map(|(i, &plain)| {
            let raw = plain.wrapping_add(key) ^ KEY_TABLE[i % KEY_TABLE.len()];
            key = raw.wrapping_add(KEY_STEP);
            raw
        })
        .collect()
}

/// Toggle the attribute mask in place.
///
/// The mask is its own inverse: applying it twice restores the input.
pub fn apply_attribute_mask(data: &mut [u8]) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= ATTRIBUTE_MASK[i % ATTRIBUTE_MASK.len()];
    }
}

/// Decrypt an attribute file and remove its mask.
#[must_use]
pub fn decrypt_attributes(data: &[u8]) -> Vec<u8> {
    let mut out = decrypt(data);
    apply_attribute_mask(&mut out);
    out
}
