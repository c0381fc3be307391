//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use novacap_rs::backend::{BYTES_PER_CHUNK, CHANNEL_BYTES, DATA_SIZE, STRIDE_BYTES};

/// A full block where byte i holds (i % 251), so every offset is unique
/// within a stride window and identifiable in assertions.
pub fn patterned_block() -> Vec<u8> {
    (0..DATA_SIZE).map(|i| (i % 251) as u8).collect()
}

/// The documented deinterleave mapping: sample `i` of chunk `chunk` comes
/// from block offset `chunk * 1024 + (i / 8) * 16 + (i % 8)`.
pub fn expected_sample(block: &[u8], chunk: usize, i: usize) -> i16 {
    let offset = chunk * BYTES_PER_CHUNK + (i / CHANNEL_BYTES) * STRIDE_BYTES + (i % CHANNEL_BYTES);
    i16::from(block[offset])
}
