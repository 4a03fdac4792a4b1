//! Hash functions used to build side and element keys.
//!
//! Keys are computed from *sorted* global node ids, so that two elements sharing a side compute
//! the same key for it regardless of their local node ordering.

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;

#[inline]
fn fnv_step(hval: u64, byte: u8) -> u64 {
    let hval = hval
        .wrapping_add(hval << 1)
        .wrapping_add(hval << 4)
        .wrapping_add(hval << 5)
        .wrapping_add(hval << 7)
        .wrapping_add(hval << 8)
        .wrapping_add(hval << 40);
    hval ^ u64::from(byte)
}

/// 64-bit Fowler/Noll/Vo hash of a byte buffer.
pub fn fnv_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hval, &byte| fnv_step(hval, byte))
}

/// 64-bit FNV hash of a sequence of words, hashed in little-endian byte order.
pub fn hashword_64(words: &[u64]) -> u64 {
    words
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .fold(FNV_OFFSET_BASIS, fnv_step)
}

/// Same as [`hashword_64`] for exactly two words.
pub fn hashword2_64(first: u64, second: u64) -> u64 {
    hashword_64(&[first, second])
}

#[inline]
fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

#[inline]
fn final_mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}

/// Bob Jenkins' `hashword` for 32-bit words.
pub fn hashword(keys: &[u32], initval: u32) -> u32 {
    let init = 0xdeadbeef_u32
        .wrapping_add((keys.len() as u32) << 2)
        .wrapping_add(initval);
    let (mut a, mut b, mut c) = (init, init, init);

    let mut rest = keys;
    while rest.len() > 3 {
        a = a.wrapping_add(rest[0]);
        b = b.wrapping_add(rest[1]);
        c = c.wrapping_add(rest[2]);
        mix(&mut a, &mut b, &mut c);
        rest = &rest[3..];
    }

    if !rest.is_empty() {
        if rest.len() == 3 {
            c = c.wrapping_add(rest[2]);
        }
        if rest.len() >= 2 {
            b = b.wrapping_add(rest[1]);
        }
        a = a.wrapping_add(rest[0]);
        final_mix(&mut a, &mut b, &mut c);
    }
    c
}

/// [`hashword`] specialized to exactly two words.
pub fn hashword2(first: u32, second: u32, initval: u32) -> u32 {
    let init = 0xdeadbeef_u32.wrapping_add(8).wrapping_add(initval);
    let (mut a, mut b, mut c) = (init, init, init);
    b = b.wrapping_add(second);
    a = a.wrapping_add(first);
    final_mix(&mut a, &mut b, &mut c);
    c
}

/// Computes an order-independent key for a set of global node ids.
///
/// A single id is its own key. Otherwise the ids are sorted and hashed with [`hashword_64`].
pub fn compute_key(ids: &[usize]) -> u64 {
    match ids {
        [] => 0,
        [id] => *id as u64,
        _ => {
            let mut sorted: Vec<u64> = ids.iter().map(|&id| id as u64).collect();
            sorted.sort_unstable();
            hashword_64(&sorted)
        }
    }
}
