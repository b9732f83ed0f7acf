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

//! Arithmetic modulo the SM2 prime p and the group order n.
//!
//! Residues are kept in Montgomery form with R = 2^256. The same reduction
//! core serves both moduli; only the (modulus, -modulus^-1 mod R) pair
//! differs.

pub(crate) mod mult;
pub(crate) mod point;

use crate::limb::{Limb, LIMB_LENGTH, ONE};
use crate::norop::{limb_mask, norop_add_pure, norop_mul_lower, norop_mul_pure, norop_select,
                   norop_sub_pure};

pub struct CurveParams {
    /// a = -3, Montgomery form.
    pub a_mont: [Limb; LIMB_LENGTH],
    /// b, Montgomery form.
    pub b_mont: [Limb; LIMB_LENGTH],
    pub p: [Limb; LIMB_LENGTH],
    pub n: [Limb; LIMB_LENGTH],
    pub p_inv_r_neg: [Limb; LIMB_LENGTH],
    /// R mod p, which is also the Montgomery form of 1 and the z of an
    /// affine point lifted to Jacobian coordinates.
    pub r_p: [Limb; LIMB_LENGTH],
    pub rr_p: [Limb; LIMB_LENGTH],
    pub n_inv_r_neg: [Limb; LIMB_LENGTH],
    pub rr_n: [Limb; LIMB_LENGTH],
}

pub static CURVE_PARAMS: CurveParams = CurveParams {
    a_mont: [
        0xffff_ffff_ffff_fffc,
        0xffff_fffc_0000_0003,
        0xffff_ffff_ffff_ffff,
        0xffff_fffb_ffff_ffff,
    ],
    b_mont: [
        0x90d2_3063_2bc0_dd42,
        0x71cf_379a_e9b5_37ab,
        0x5279_8150_5ea5_1c3c,
        0x240f_e188_ba20_e2c8,
    ],
    p: [
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_0000_0000,
        0xffff_ffff_ffff_ffff,
        0xffff_fffe_ffff_ffff,
    ],
    n: [
        0x53bb_f409_39d5_4123,
        0x7203_df6b_21c6_052b,
        0xffff_ffff_ffff_ffff,
        0xffff_fffe_ffff_ffff,
    ],
    p_inv_r_neg: [
        0x0000_0000_0000_0001,
        0xffff_ffff_0000_0001,
        0xffff_fffe_0000_0000,
        0xffff_fffc_0000_0001,
    ],
    r_p: [
        0x0000_0000_0000_0001,
        0x0000_0000_ffff_ffff,
        0x0000_0000_0000_0000,
        0x0000_0001_0000_0000,
    ],
    rr_p: [
        0x0000_0002_0000_0003,
        0x0000_0002_ffff_ffff,
        0x0000_0001_0000_0001,
        0x0000_0004_0000_0002,
    ],
    n_inv_r_neg: [
        0x327f_9e88_7235_0975,
        0xdf1e_8d34_fc83_19a5,
        0x2b00_68d3_b089_41d4,
        0x6f39_132f_82e4_c7bc,
    ],
    rr_n: [
        0x9011_92af_7c11_4f20,
        0x3464_504a_de6f_a2fa,
        0x620f_c84c_3aff_e0d4,
        0x1eb5_e412_a22b_3d3b,
    ],
};

/// One Montgomery reduction step shared by both moduli:
/// returns a * b / R mod m.
#[inline]
fn montgomery_pro(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
    m: &[Limb; LIMB_LENGTH],
    m_inv_neg: &[Limb; LIMB_LENGTH],
) -> [Limb; LIMB_LENGTH] {
    let mut t = [0; LIMB_LENGTH * 2];
    norop_mul_pure(&mut t, a, b);

    let mut t_lo = [0; LIMB_LENGTH];
    t_lo.copy_from_slice(&t[..LIMB_LENGTH]);
    let mut u = [0; LIMB_LENGTH];
    norop_mul_lower(&mut u, &t_lo, m_inv_neg);

    let mut um = [0; LIMB_LENGTH * 2];
    norop_mul_pure(&mut um, &u, m);

    let mut sum = [0; LIMB_LENGTH * 2];
    let carry = norop_add_pure(&mut sum, &t, &um);

    // the low half is now zero; keep the high half, less m when it overflows
    let mut hi = [0; LIMB_LENGTH];
    hi.copy_from_slice(&sum[LIMB_LENGTH..]);
    let mut d = [0; LIMB_LENGTH];
    let borrow = norop_sub_pure(&mut d, &hi, m);
    let mut r = [0; LIMB_LENGTH];
    norop_select(&mut r, &d, &hi, limb_mask(carry | (borrow ^ 1)));
    r
}

#[inline]
fn mod_add(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
    m: &[Limb; LIMB_LENGTH],
) -> [Limb; LIMB_LENGTH] {
    let mut sum = [0; LIMB_LENGTH];
    let carry = norop_add_pure(&mut sum, a, b);
    let mut d = [0; LIMB_LENGTH];
    let borrow = norop_sub_pure(&mut d, &sum, m);
    let mut r = [0; LIMB_LENGTH];
    norop_select(&mut r, &d, &sum, limb_mask(carry | (borrow ^ 1)));
    r
}

#[inline]
fn mod_sub(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
    m: &[Limb; LIMB_LENGTH],
) -> [Limb; LIMB_LENGTH] {
    let mut d = [0; LIMB_LENGTH];
    let borrow = norop_sub_pure(&mut d, a, b);
    let mut fixed = [0; LIMB_LENGTH];
    let _ = norop_add_pure(&mut fixed, &d, m);
    let mut r = [0; LIMB_LENGTH];
    norop_select(&mut r, &fixed, &d, limb_mask(borrow));
    r
}

#[inline]
pub(crate) fn mont_pro(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    montgomery_pro(a, b, &CURVE_PARAMS.p, &CURVE_PARAMS.p_inv_r_neg)
}

#[inline]
pub(crate) fn scalar_mont_pro(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
) -> [Limb; LIMB_LENGTH] {
    montgomery_pro(a, b, &CURVE_PARAMS.n, &CURVE_PARAMS.n_inv_r_neg)
}

#[inline]
pub(crate) fn add_mod(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    mod_add(a, b, &CURVE_PARAMS.p)
}

#[inline]
pub(crate) fn sub_mod(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    mod_sub(a, b, &CURVE_PARAMS.p)
}

#[inline]
pub(crate) fn scalar_add_mod(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
) -> [Limb; LIMB_LENGTH] {
    mod_add(a, b, &CURVE_PARAMS.n)
}

#[inline]
pub(crate) fn scalar_sub_mod(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
) -> [Limb; LIMB_LENGTH] {
    mod_sub(a, b, &CURVE_PARAMS.n)
}

#[inline]
pub(crate) fn to_mont(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    mont_pro(a, &CURVE_PARAMS.rr_p)
}

#[inline]
pub(crate) fn from_mont(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    mont_pro(a, &ONE)
}

#[inline]
pub(crate) fn scalar_to_mont(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    scalar_mont_pro(a, &CURVE_PARAMS.rr_n)
}

#[inline]
fn mont_sqr(a: &[Limb; LIMB_LENGTH], count: usize) -> [Limb; LIMB_LENGTH] {
    let mut r = *a;
    for _ in 0..count {
        r = mont_pro(&r, &r);
    }
    r
}

#[inline]
fn scalar_sqr(a: &[Limb; LIMB_LENGTH], count: usize) -> [Limb; LIMB_LENGTH] {
    let mut r = *a;
    for _ in 0..count {
        r = scalar_mont_pro(&r, &r);
    }
    r
}

/// a^(p-2) by a fixed addition chain. Montgomery in, Montgomery out.
pub(crate) fn invert(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    // windows of set bits of p - 2, widest first
    let x2 = mont_pro(&mont_sqr(a, 1), a);
    let x4 = mont_pro(&mont_sqr(&x2, 2), &x2);
    let x6 = mont_pro(&mont_sqr(&x4, 2), &x2);
    let x7 = mont_pro(&mont_sqr(&x6, 1), a);
    let x8 = mont_pro(&mont_sqr(&x7, 1), a);
    let x15 = mont_pro(&mont_sqr(&x8, 7), &x7);
    let x30 = mont_pro(&mont_sqr(&x15, 15), &x15);
    let x31 = mont_pro(&mont_sqr(&x30, 1), a);
    let x32 = mont_pro(&mont_sqr(&x31, 1), a);

    let mut r = mont_pro(&mont_sqr(&x31, 33), &x32);
    r = mont_pro(&mont_sqr(&r, 32), &x32);
    r = mont_pro(&mont_sqr(&r, 32), &x32);
    r = mont_pro(&mont_sqr(&r, 32), &x32);
    r = mont_pro(&mont_sqr(&r, 64), &x32);
    r = mont_pro(&mont_sqr(&r, 30), &x30);
    mont_pro(&mont_sqr(&r, 2), a)
}

/// a^(n-2) by a fixed addition chain. Plain in, Montgomery out; callers
/// that need a plain inverse multiply by a plain value afterwards.
pub(crate) fn scalar_inv(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    let d1 = scalar_to_mont(a);
    let d10 = scalar_sqr(&d1, 1);
    let d11 = scalar_mont_pro(&d10, &d1);
    let d101 = scalar_mont_pro(&d10, &d11);
    let d111 = scalar_mont_pro(&d10, &d101);
    let d1001 = scalar_mont_pro(&d10, &d111);
    let x4 = scalar_mont_pro(&scalar_sqr(&d111, 1), &d1);
    let x5 = scalar_mont_pro(&scalar_sqr(&x4, 1), &d1);
    let x10 = scalar_mont_pro(&scalar_sqr(&x5, 5), &x5);
    let x20 = scalar_mont_pro(&scalar_sqr(&x10, 10), &x10);
    let x30 = scalar_mont_pro(&scalar_sqr(&x20, 10), &x10);
    let x31 = scalar_mont_pro(&scalar_sqr(&x30, 1), &d1);
    let x32 = scalar_mont_pro(&scalar_sqr(&x31, 1), &d1);

    const SQRS: [usize; 27] = [
        33, 32, 32, 4, 3, 11, 6, 3, 4, 4, 7, 5, 9, 5, 3, 4, 5, 4, 6, 3, 10, 5, 5, 4, 4, 9, 5,
    ];
    let muls = [
        &x32, &x32, &x32, &d111, &d1, &x4, &x5, &d11, &d101, &d1001, &d111, &d11, &d101, &d101,
        &d11, &d101, &d111, &d111, &x5, &d101, &d1001, &d111, &d111, &d101, &d101, &d1001, &d1,
    ];

    let mut r = x31;
    for (count, digit) in SQRS.iter().zip(muls.iter()) {
        r = scalar_mont_pro(&scalar_sqr(&r, *count), digit);
    }
    r
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::norop::parse_big_endian;

    fn gx() -> [Limb; LIMB_LENGTH] {
        [
            0x715a_4589_334c_74c7,
            0x8fe3_0bbf_f266_0be1,
            0x5f99_0446_6a39_c994,
            0x32c4_ae2c_1f19_8119,
        ]
    }

    #[test]
    fn mont_round_trip_test() {
        let a = gx();
        assert_eq!(from_mont(&to_mont(&a)), a);
    }

    #[test]
    fn mont_pro_identity_test() {
        // R * R / R = R
        assert_eq!(mont_pro(&CURVE_PARAMS.r_p, &CURVE_PARAMS.r_p), CURVE_PARAMS.r_p);
        // x * R^2 / R then * 1 / R strips both factors
        let am = to_mont(&gx());
        assert_eq!(mont_pro(&am, &ONE), gx());
    }

    #[test]
    fn add_sub_mod_test() {
        let a = to_mont(&gx());
        let doubled = add_mod(&a, &a);
        assert_eq!(sub_mod(&doubled, &a), a);
        assert_eq!(sub_mod(&a, &a), [0; LIMB_LENGTH]);
        // 0 - x + x = 0
        let neg = sub_mod(&[0; LIMB_LENGTH], &a);
        assert_eq!(add_mod(&neg, &a), [0; LIMB_LENGTH]);
    }

    #[test]
    fn invert_test() {
        let am = to_mont(&gx());
        // x * x^-1 = 1, both in Montgomery form, so the product is R
        assert_eq!(mont_pro(&invert(&am), &am), CURVE_PARAMS.r_p);
    }

    #[test]
    fn a_mont_test() {
        // a = p - 3
        let mut a = [0; LIMB_LENGTH];
        let _ = parse_big_endian(
            &mut a,
            &hex::decode("fffffffeffffffffffffffffffffffffffffffff00000000fffffffffffffffc")
                .unwrap(),
        );
        assert_eq!(to_mont(&a), CURVE_PARAMS.a_mont);
    }

    #[test]
    fn scalar_inv_test() {
        let k = gx();
        let km = scalar_to_mont(&k);
        let one_m = scalar_to_mont(&ONE);
        assert_eq!(scalar_mont_pro(&scalar_inv(&k), &km), one_m);
    }

    #[test]
    fn scalar_add_sub_mod_test() {
        let k = gx();
        let sum = scalar_add_mod(&k, &k);
        assert_eq!(scalar_sub_mod(&sum, &k), k);
        // n - 1 + 1 wraps to 0
        let mut n_minus_1 = CURVE_PARAMS.n;
        n_minus_1[0] -= 1;
        assert_eq!(scalar_add_mod(&n_minus_1, &ONE), [0; LIMB_LENGTH]);
    }
}
