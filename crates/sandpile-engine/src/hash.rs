//! Hashing utilities for grid state comparison.
//!
//! Uses FNV-1a for fast, deterministic hashing. These hashes are not
//! cryptographically secure; they exist to compare runs cheaply.

use sandpile_core::Grain;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash a grid's dimensions and row-major cell values.
///
/// Dimensions are folded in first so that two grids with the same cells
/// laid out differently hash differently.
pub fn grid_hash(width: usize, height: usize, cells: &[Grain]) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, width as u64);
    hash = fnv1a_u64(hash, height as u64);
    for &v in cells {
        hash = fnv1a_u32(hash, v);
    }
    hash
}
