// Copyright 2021 The crypto-gm Project Developers.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY
// SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN ACTION
// OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF OR IN
// CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

//! Plain multi-precision helpers over limb slices. Nothing here knows about
//! a modulus; reduction lives in `sm2p256`.

use crate::err::Error;
use crate::limb::{DoubleLimb, Limb, LIMB_BITS, LIMB_BYTES, LIMB_LENGTH};

/// Schoolbook product. `r.len() >= a.len() + b.len()`.
#[inline]
pub(crate) fn norop_mul_pure(r: &mut [Limb], a: &[Limb], b: &[Limb]) {
    let la = a.len();
    let lb = b.len();
    assert!(r.len() >= la + lb);
    for limb in r[..la + lb].iter_mut() {
        *limb = 0;
    }
    for i in 0..la {
        let mut carry: Limb = 0;
        for j in 0..lb {
            let t = DoubleLimb::from(a[i]) * DoubleLimb::from(b[j])
                + DoubleLimb::from(r[i + j])
                + DoubleLimb::from(carry);
            r[i + j] = t as Limb;
            carry = (t >> LIMB_BITS) as Limb;
        }
        r[i + lb] = carry;
    }
}

/// The low `LIMB_LENGTH` limbs of the product, for Montgomery reduction.
#[inline]
pub(crate) fn norop_mul_lower(
    r: &mut [Limb; LIMB_LENGTH],
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
) {
    for limb in r.iter_mut() {
        *limb = 0;
    }
    for i in 0..LIMB_LENGTH {
        let mut carry: Limb = 0;
        for j in 0..LIMB_LENGTH - i {
            let t = DoubleLimb::from(a[i]) * DoubleLimb::from(b[j])
                + DoubleLimb::from(r[i + j])
                + DoubleLimb::from(carry);
            r[i + j] = t as Limb;
            carry = (t >> LIMB_BITS) as Limb;
        }
    }
}

/// Equal-length addition. Returns the carry limb (0 or 1).
#[inline]
pub(crate) fn norop_add_pure(r: &mut [Limb], a: &[Limb], b: &[Limb]) -> Limb {
    assert!(a.len() == b.len() && r.len() >= a.len());
    let mut carry: Limb = 0;
    for i in 0..a.len() {
        let t = DoubleLimb::from(a[i]) + DoubleLimb::from(b[i]) + DoubleLimb::from(carry);
        r[i] = t as Limb;
        carry = (t >> LIMB_BITS) as Limb;
    }
    carry
}

/// Equal-length subtraction. Returns the borrow limb (0 or 1).
#[inline]
pub(crate) fn norop_sub_pure(r: &mut [Limb], a: &[Limb], b: &[Limb]) -> Limb {
    assert!(a.len() == b.len() && r.len() >= a.len());
    let mut borrow: Limb = 0;
    for i in 0..a.len() {
        let t = DoubleLimb::from(a[i])
            .wrapping_sub(DoubleLimb::from(b[i]) + DoubleLimb::from(borrow));
        r[i] = t as Limb;
        borrow = ((t >> LIMB_BITS) as Limb) & 1;
    }
    borrow
}

/// All ones when `c` is non-zero, all zeros otherwise.
#[inline]
pub(crate) fn limb_mask(c: Limb) -> Limb {
    let v = c | c.wrapping_neg();
    (v >> (LIMB_BITS - 1)).wrapping_neg()
}

/// `r = a` where the mask is all ones, `r = b` where it is all zeros.
#[inline]
pub(crate) fn norop_select(r: &mut [Limb], a: &[Limb], b: &[Limb], mask: Limb) {
    assert!(a.len() == b.len() && r.len() == a.len());
    for i in 0..r.len() {
        r[i] = (a[i] & mask) | (b[i] & !mask);
    }
}

#[inline]
pub(crate) fn norop_limbs_less_than(a: &[Limb], b: &[Limb]) -> bool {
    assert_eq!(a.len(), b.len());
    let mut borrow: Limb = 0;
    for i in 0..a.len() {
        let t = DoubleLimb::from(a[i])
            .wrapping_sub(DoubleLimb::from(b[i]) + DoubleLimb::from(borrow));
        borrow = ((t >> LIMB_BITS) as Limb) & 1;
    }
    borrow == 1
}

#[inline]
pub(crate) fn norop_limbs_equal_with(a: &[Limb], b: &[Limb]) -> bool {
    assert_eq!(a.len(), b.len());
    let mut acc: Limb = 0;
    for i in 0..a.len() {
        acc |= a[i] ^ b[i];
    }
    acc == 0
}

#[inline]
pub(crate) fn norop_limbs_are_zero(a: &[Limb]) -> bool {
    a.iter().fold(0, |acc, &limb| acc | limb) == 0
}

/// Parses a big-endian byte string into little-endian limbs, left-padding
/// short input with zeros. Input longer than the limb capacity is rejected.
pub(crate) fn parse_big_endian(output: &mut [Limb], input: &[u8]) -> Result<(), Error> {
    if input.len() > output.len() * LIMB_BYTES {
        return Err(Error::InvalidKeyEncoding);
    }

    for limb in output.iter_mut() {
        *limb = 0;
    }
    for (i, &byte) in input.iter().rev().enumerate() {
        output[i / LIMB_BYTES] |= Limb::from(byte) << ((i % LIMB_BYTES) * 8);
    }

    Ok(())
}

pub fn big_endian_from_limbs(limbs: &[Limb], out: &mut [u8]) {
    let num_limbs = limbs.len();
    assert_eq!(out.len(), num_limbs * LIMB_BYTES);
    for i in 0..num_limbs {
        out[(num_limbs - 1 - i) * LIMB_BYTES..][..LIMB_BYTES]
            .copy_from_slice(&limbs[i].to_be_bytes());
    }
}

#[cfg(test)]
mod test {
    use crate::limb::{Limb, LIMB_LENGTH};
    use crate::norop::*;

    #[test]
    fn norop_mul_pure_test() {
        let mut r = [0; 2 * LIMB_LENGTH];
        let a = [0xffff_ffff_ffff_ffff; LIMB_LENGTH];
        norop_mul_pure(&mut r, &a, &a);
        // (2^256 - 1)^2 = 2^512 - 2^257 + 1
        assert_eq!(
            r,
            [
                1,
                0,
                0,
                0,
                0xffff_ffff_ffff_fffe,
                0xffff_ffff_ffff_ffff,
                0xffff_ffff_ffff_ffff,
                0xffff_ffff_ffff_ffff
            ]
        );

        let mut r = [0; 2 * LIMB_LENGTH];
        norop_mul_pure(&mut r, &[2, 0, 0, 0], &[0, 1, 0, 0]);
        assert_eq!(r, [0, 2, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn norop_mul_lower_test() {
        let a = [
            0xd89cdf6229c4bddf,
            0xacf005cd78843090,
            0xe5a220abf7212ed6,
            0xdc30061d04874834,
        ];
        let b = [
            0xacf005cd78843090,
            0xd89cdf6229c4bddf,
            0xdc30061d04874834,
            0xe5a220abf7212ed6,
        ];
        let mut full = [0; 2 * LIMB_LENGTH];
        norop_mul_pure(&mut full, &a, &b);
        let mut lower = [0; LIMB_LENGTH];
        norop_mul_lower(&mut lower, &a, &b);
        assert_eq!(lower, full[..LIMB_LENGTH]);
    }

    #[test]
    fn norop_add_sub_round_trip_test() {
        let a = [
            0xd89cdf6229c4bddf,
            0xacf005cd78843090,
            0xe5a220abf7212ed6,
            0xdc30061d04874834,
        ];
        let b = [
            0xacf005cd78843090,
            0xd89cdf6229c4bddf,
            0xdc30061d04874834,
            0xe5a220abf7212ed6,
        ];
        let mut sum = [0; LIMB_LENGTH];
        let carry = norop_add_pure(&mut sum, &a, &b);
        assert_eq!(carry, 1);
        let mut back = [0; LIMB_LENGTH];
        let borrow = norop_sub_pure(&mut back, &sum, &b);
        assert_eq!(borrow, 1); // the carry out and the borrow back cancel
        assert_eq!(back, a);
    }

    #[test]
    fn limb_mask_test() {
        assert_eq!(limb_mask(0), 0);
        assert_eq!(limb_mask(1), Limb::max_value());
        assert_eq!(limb_mask(0x8000_0000_0000_0000), Limb::max_value());
        assert_eq!(limb_mask(Limb::max_value()), Limb::max_value());
    }

    #[test]
    fn norop_select_test() {
        let a = [1, 2, 3, 4];
        let b = [5, 6, 7, 8];
        let mut r = [0; 4];
        norop_select(&mut r, &a, &b, Limb::max_value());
        assert_eq!(r, a);
        norop_select(&mut r, &a, &b, 0);
        assert_eq!(r, b);
    }

    #[test]
    fn norop_limbs_less_than_test() {
        let a = [0x12345, 0x23456, 0x34567, 0x45678];
        let b = [0x12344, 0x23456, 0x34567, 0x45678];
        assert!(!norop_limbs_less_than(&a, &b));
        assert!(norop_limbs_less_than(&b, &a));
        assert!(!norop_limbs_less_than(&a, &a));
    }

    #[test]
    fn parse_big_endian_test() {
        let mut out = [0; LIMB_LENGTH];
        parse_big_endian(&mut out, &[0x01, 0x02]).unwrap();
        assert_eq!(out, [0x0102, 0, 0, 0]);

        parse_big_endian(&mut out, &[0xab; 33]).unwrap_err();

        let mut bytes = [0u8; 32];
        bytes[0] = 0xde;
        bytes[31] = 0xad;
        parse_big_endian(&mut out, &bytes).unwrap();
        assert_eq!(out[0], 0xad);
        assert_eq!(out[3], 0xde00_0000_0000_0000);

        let mut back = [0u8; 32];
        big_endian_from_limbs(&out, &mut back);
        assert_eq!(back, bytes);
    }
}
