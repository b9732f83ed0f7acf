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

//! Scalar multiplication: a Booth window-5 walk for arbitrary points and a
//! Booth window-6 walk over a cached affine table for the base point.

use crate::limb::{Limb, LIMB_BITS, LIMB_LENGTH};
use crate::norop::limb_mask;
use crate::sm2p256::point::{
    neg_cond, point_add, point_add_affine_cond, point_cmov, point_double, Point,
};
use crate::sm2p256::{invert, mont_pro, CURVE_PARAMS};
use std::sync::OnceLock;

/// The base point G in Montgomery form.
const GX_MONT: [Limb; LIMB_LENGTH] = [
    0x6132_8990_f418_029e,
    0x3e79_81ed_dca6_c050,
    0xd6a1_ed99_ac24_c3c3,
    0x9116_7a5e_e1c1_3b05,
];
const GY_MONT: [Limb; LIMB_LENGTH] = [
    0xc135_4e59_3c2d_0ddd,
    0xc1f5_e578_8d32_95fa,
    0x8d4c_fb06_6e2a_48f8,
    0x63cd_65d4_81d7_35bd,
];

pub(crate) fn base_point() -> Point {
    Point::from_affine(&GX_MONT, &GY_MONT)
}

/// Booth recoding of a 6-bit window (window width 5).
/// Returns (digit, sign).
#[inline]
fn booth_w5(input: Limb) -> (Limb, Limb) {
    let s = !((input >> 5).wrapping_sub(1));
    let mut d = (1 << 6) - input - 1;
    d = (d & s) | (input & !s);
    d = (d >> 1) + (d & 1);
    (d, s & 1)
}

/// Booth recoding of a 7-bit window (window width 6).
#[inline]
fn booth_w6(input: Limb) -> (Limb, Limb) {
    let s = !((input >> 6).wrapping_sub(1));
    let mut d = (1 << 7) - input - 1;
    d = (d & s) | (input & !s);
    d = (d >> 1) + (d & 1);
    (d, s & 1)
}

/// The window of the scalar starting at bit `index`, masked to the window
/// width, stitching across the limb boundary when needed.
#[inline]
fn booth_window(scalar: &[Limb; LIMB_LENGTH], index: usize, mask: Limb) -> Limb {
    let limb = index / LIMB_BITS;
    let shift = index % LIMB_BITS;
    let mut w = scalar[limb] >> shift;
    if shift > 0 && limb + 1 < LIMB_LENGTH {
        w |= scalar[limb + 1] << (LIMB_BITS - shift);
    }
    w & mask
}

/// Masked scan over the 16-entry table; `sel` in 1..=16 picks an entry,
/// 0 leaves the zero point.
fn select_point(table: &[Point; 16], sel: Limb) -> Point {
    let mut r = Point::zero();
    for (i, entry) in table.iter().enumerate() {
        let mask = !limb_mask(sel ^ (i as Limb + 1));
        point_cmov(&mut r, entry, mask);
    }
    r
}

/// [scalar]P for an arbitrary Jacobian point, scalar in [0, n) plain form.
pub(crate) fn point_mul(p: &Point, scalar: &[Limb; LIMB_LENGTH]) -> Point {
    // 1P..16P; the order of operations below resolves every entry from
    // already-stored ones
    let mut precomp = [Point::zero(); 16];
    precomp[0] = *p;

    let mut t0 = point_double(p);
    let mut t1 = point_double(&t0);
    let mut t2 = point_double(&t1);
    let t3 = point_double(&t2);
    precomp[1] = t0; // 2
    precomp[3] = t1; // 4
    precomp[7] = t2; // 8
    precomp[15] = t3; // 16

    t0 = point_add(&t0, p); // 3
    t1 = point_add(&t1, p); // 5
    t2 = point_add(&t2, p); // 9
    precomp[2] = t0;
    precomp[4] = t1;
    precomp[8] = t2;

    t0 = point_double(&t0); // 6
    t1 = point_double(&t1); // 10
    precomp[5] = t0;
    precomp[9] = t1;

    t2 = point_add(&t0, p); // 7
    t1 = point_add(&t1, p); // 11
    precomp[6] = t2;
    precomp[10] = t1;

    t0 = point_double(&t0); // 12
    t2 = point_double(&t2); // 14
    precomp[11] = t0;
    precomp[13] = t2;

    t0 = point_add(&t0, p); // 13
    t2 = point_add(&t2, p); // 15
    precomp[12] = t0;
    precomp[14] = t2;

    let mut index: usize = 254;
    let wvalue = booth_window(scalar, index, 0x3f);
    let (sel, _) = booth_w5(wvalue);
    let mut acc = select_point(&precomp, sel);
    let mut zero = sel;

    while index > 4 {
        index -= 5;
        acc = point_double(&acc);
        acc = point_double(&acc);
        acc = point_double(&acc);
        acc = point_double(&acc);
        acc = point_double(&acc);

        let wvalue = booth_window(scalar, index, 0x3f);
        let (sel, sign) = booth_w5(wvalue);

        let mut t = select_point(&precomp, sel);
        neg_cond(&mut t.y, limb_mask(sign));
        let mut sum = point_add(&t, &acc);
        point_cmov(&mut sum, &acc, !limb_mask(sel));
        let mut next = t;
        point_cmov(&mut next, &sum, limb_mask(zero));
        acc = next;
        zero |= sel;
    }

    acc = point_double(&acc);
    acc = point_double(&acc);
    acc = point_double(&acc);
    acc = point_double(&acc);
    acc = point_double(&acc);

    let wvalue = (scalar[0] << 1) & 0x3f;
    let (sel, sign) = booth_w5(wvalue);
    let mut t = select_point(&precomp, sel);
    neg_cond(&mut t.y, limb_mask(sign));
    let mut sum = point_add(&acc, &t);
    point_cmov(&mut sum, &acc, !limb_mask(sel));
    let mut out = t;
    point_cmov(&mut out, &sum, limb_mask(zero));
    out
}

/// Affine Montgomery pairs x || y; entry (i, j) holds (j + 1) * 64^i * G.
type BaseTable = [[[Limb; LIMB_LENGTH * 2]; 32]; 43];

static BASE_TABLE: OnceLock<Box<BaseTable>> = OnceLock::new();

fn base_table() -> &'static BaseTable {
    BASE_TABLE.get_or_init(init_base_table)
}

/// Built once on first use; every entry is normalized back to affine so the
/// hot path can use the cheaper mixed addition.
fn init_base_table() -> Box<BaseTable> {
    let base = base_point();
    let mut table: Box<BaseTable> = Box::new([[[0; LIMB_LENGTH * 2]; 32]; 43]);

    let mut t2 = base;
    for j in 0..32 {
        let mut t1 = t2;
        for (i, row) in table.iter_mut().enumerate() {
            if i != 0 {
                for _ in 0..6 {
                    t1 = point_double(&t1);
                }
            }
            let z_inv = invert(&t1.z);
            let z_inv_sq = mont_pro(&z_inv, &z_inv);
            let z_inv_cub = mont_pro(&z_inv, &z_inv_sq);
            t1.x = mont_pro(&t1.x, &z_inv_sq);
            t1.y = mont_pro(&t1.y, &z_inv_cub);
            t1.z = CURVE_PARAMS.r_p;
            row[j][..LIMB_LENGTH].copy_from_slice(&t1.x);
            row[j][LIMB_LENGTH..].copy_from_slice(&t1.y);
        }
        t2 = if j == 0 {
            point_double(&base)
        } else {
            point_add(&t2, &base)
        };
    }

    table
}

fn select_base(
    table: &BaseTable,
    index: usize,
    sel: Limb,
) -> ([Limb; LIMB_LENGTH], [Limb; LIMB_LENGTH]) {
    let mut x = [0; LIMB_LENGTH];
    let mut y = [0; LIMB_LENGTH];
    for (i, entry) in table[index].iter().enumerate() {
        let mask = !limb_mask(sel ^ (i as Limb + 1));
        for k in 0..LIMB_LENGTH {
            x[k] = (entry[k] & mask) | (x[k] & !mask);
            y[k] = (entry[LIMB_LENGTH + k] & mask) | (y[k] & !mask);
        }
    }
    (x, y)
}

/// [scalar]G, scalar in [0, n) plain form. A zero scalar yields the
/// placeholder (0, 0, R); callers reject zero scalars beforehand.
pub(crate) fn base_point_mul(scalar: &[Limb; LIMB_LENGTH]) -> Point {
    let table = base_table();

    let wvalue = (scalar[0] << 1) & 0x7f;
    let (sel, sign) = booth_w6(wvalue);
    let (x, mut y) = select_base(table, 0, sel);
    neg_cond(&mut y, limb_mask(sign));
    let mut acc = Point::from_affine(&x, &y);
    let mut zero = sel;

    let mut index = 5;
    for i in 1..43 {
        let wvalue = booth_window(scalar, index, 0x7f);
        index += 6;
        let (sel, sign) = booth_w6(wvalue);
        let (bx, by) = select_base(table, i, sel);
        acc = point_add_affine_cond(&acc, &bx, &by, sign, sel, zero);
        zero |= sel;
    }

    acc
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::limb::{LIMB_BYTES, ONE};
    use crate::norop::{big_endian_from_limbs, parse_big_endian};
    use crate::sm2p256::point::point_equal;
    use crate::sm2p256::to_mont;

    fn scalar_from_hex(s: &str) -> [Limb; LIMB_LENGTH] {
        let mut r = [0; LIMB_LENGTH];
        parse_big_endian(&mut r, &hex::decode(s).unwrap()).unwrap();
        r
    }

    fn affine_hex(p: &Point) -> (String, String) {
        let z_inv = invert(&p.z);
        let z_inv_sq = mont_pro(&z_inv, &z_inv);
        let z_inv_cub = mont_pro(&z_inv, &z_inv_sq);
        let x = mont_pro(&mont_pro(&p.x, &z_inv_sq), &ONE);
        let y = mont_pro(&mont_pro(&p.y, &z_inv_cub), &ONE);
        let mut xb = [0u8; LIMB_LENGTH * LIMB_BYTES];
        let mut yb = [0u8; LIMB_LENGTH * LIMB_BYTES];
        big_endian_from_limbs(&x, &mut xb);
        big_endian_from_limbs(&y, &mut yb);
        (hex::encode(xb), hex::encode(yb))
    }

    #[test]
    fn base_point_constants_test() {
        let gx = scalar_from_hex("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7");
        let gy = scalar_from_hex("bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0");
        assert_eq!(to_mont(&gx), GX_MONT);
        assert_eq!(to_mont(&gy), GY_MONT);
    }

    #[test]
    fn booth_recode_test() {
        // window value 0 has digit 0, positive sign
        assert_eq!(booth_w5(0), (0, 0));
        // 0b000011 encodes +2 at width 5
        assert_eq!(booth_w5(0b11), (2, 0));
        // the all-ones window carries into the next one and encodes 0 here
        assert_eq!(booth_w5(0x3f), (0, 1));
        assert_eq!(booth_w6(0x7f), (0, 1));
        // 0b100000 encodes -16
        assert_eq!(booth_w5(0b10_0000), (16, 1));
        assert_eq!(booth_w6(0), (0, 0));
    }

    #[test]
    fn base_mul_known_answer_test() {
        // GB/T 32918.5 appendix A example key
        let d = scalar_from_hex("3945208f7b2144b13f36e38ac6d39f95889393692860b51a42fb81ef4df7c5b8");
        let q = base_point_mul(&d);
        let (x, y) = affine_hex(&q);
        assert_eq!(x, "09f9df311e5421a150dd7d161e4bc5c672179fad1833fc076bb08ff356f35020");
        assert_eq!(y, "ccea490ce26775a52dc6ea718cc1aa600aed05fbf35e084a6632f6072da9ad13");
    }

    #[test]
    fn base_mul_one_test() {
        let q = base_point_mul(&ONE);
        assert!(point_equal(&q, &base_point()));
    }

    #[test]
    fn point_mul_matches_base_mul_test() {
        let k = scalar_from_hex("59276e27d506861a16680f3ad9c02dccef3cc1fa3cdbe4ce6d54b80deac1bc21");
        let expected = base_point_mul(&k);
        let got = point_mul(&base_point(), &k);
        assert!(point_equal(&expected, &got));

        let small = scalar_from_hex("4f5da2"); // 5201314
        let expected = base_point_mul(&small);
        let got = point_mul(&base_point(), &small);
        assert!(point_equal(&expected, &got));
    }

    #[test]
    fn point_mul_zero_test() {
        assert!(point_mul(&base_point(), &[0; LIMB_LENGTH]).is_infinity());
    }
}
