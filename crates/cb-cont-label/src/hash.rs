//! Action-name hashing.
//!
//! Names made only of ASCII digits map to their decimal value plus the seed,
//! so numeric action ids survive a text round trip. Every other name is
//! hashed with MurmurHash3 (x86, 32-bit) using the seed.

/// Hash an action name into its 32-bit identifier.
///
/// Leading and trailing ASCII whitespace/control bytes are ignored. An empty
/// name hashes to `seed`.
pub fn hash_action(name: &str, seed: u32) -> u32 {
    let trimmed = trim_ascii(name.as_bytes());

    let mut value: u64 = 0;
    for &b in trimmed {
        if !b.is_ascii_digit() {
            return murmur3_32(trimmed, seed);
        }
        value = value.wrapping_mul(10).wrapping_add(u64::from(b - b'0'));
    }
    value.wrapping_add(u64::from(seed)) as u32
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let is_space = |b: &u8| *b <= 0x20;
    let start = bytes.iter().position(|b| !is_space(b)).unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !is_space(b))
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// MurmurHash3 x86_32.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h = seed;
    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k: u32 = 0;
        for (i, &b) in tail.iter().enumerate() {
            k |= u32::from(b) << (8 * i);
        }
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
    }

    h ^= data.len() as u32;
    fmix32(h)
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
