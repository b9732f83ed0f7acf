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

//! Jacobian point arithmetic. Coordinates are Montgomery residues; z = 0
//! encodes the point at infinity.

use crate::limb::{Limb, LIMB_LENGTH};
use crate::norop::{limb_mask, norop_limbs_are_zero, norop_limbs_equal_with};
use crate::sm2p256::{add_mod, mont_pro, sub_mod, CURVE_PARAMS};

/// 3 * R mod p, the curve constant -a in the z = 1 doubling.
const THREE_R: [Limb; LIMB_LENGTH] = [0x3, 0x2_ffff_fffd, 0, 0x3_0000_0000];

#[derive(Copy, Clone)]
pub(crate) struct Point {
    pub x: [Limb; LIMB_LENGTH],
    pub y: [Limb; LIMB_LENGTH],
    pub z: [Limb; LIMB_LENGTH],
}

impl Point {
    pub fn zero() -> Self {
        Point {
            x: [0; LIMB_LENGTH],
            y: [0; LIMB_LENGTH],
            z: [0; LIMB_LENGTH],
        }
    }

    /// Lifts an affine point (Montgomery coordinates) to z = 1.
    pub fn from_affine(x: &[Limb; LIMB_LENGTH], y: &[Limb; LIMB_LENGTH]) -> Self {
        Point {
            x: *x,
            y: *y,
            z: CURVE_PARAMS.r_p,
        }
    }

    pub fn is_infinity(&self) -> bool {
        norop_limbs_are_zero(&self.z)
    }
}

/// 2001 Bernstein p-224 doubling, valid for any z.
pub(crate) fn point_double(a: &Point) -> Point {
    let delta = mont_pro(&a.z, &a.z);
    let gamma = mont_pro(&a.y, &a.y);
    let beta = mont_pro(&a.x, &gamma);

    // alpha = 3 * (x - delta) * (x + delta), expanded with x^2 - delta^2
    let t1 = mont_pro(&a.x, &a.x);
    let t2 = mont_pro(&delta, &delta);
    let diff = sub_mod(&t1, &t2);
    let mut alpha = add_mod(&diff, &diff);
    alpha = add_mod(&alpha, &diff);

    let mut x3 = mont_pro(&alpha, &alpha);
    let mut beta8 = add_mod(&beta, &beta);
    beta8 = add_mod(&beta8, &beta8);
    beta8 = add_mod(&beta8, &beta8);
    x3 = sub_mod(&x3, &beta8);

    let mut z3 = mont_pro(&a.y, &a.z);
    z3 = add_mod(&z3, &z3);

    let mut beta4 = add_mod(&beta, &beta);
    beta4 = add_mod(&beta4, &beta4);
    beta4 = sub_mod(&beta4, &x3);

    let gamma2 = mont_pro(&gamma, &gamma);
    let mut y3 = mont_pro(&alpha, &beta4);
    let mut gamma8 = add_mod(&gamma2, &gamma2);
    gamma8 = add_mod(&gamma8, &gamma8);
    gamma8 = add_mod(&gamma8, &gamma8);
    y3 = sub_mod(&y3, &gamma8);

    Point { x: x3, y: y3, z: z3 }
}

/// Doubling specialized to z = 1 (one multiplication saved).
pub(crate) fn point_double_z1(a: &Point) -> Point {
    debug_assert!(norop_limbs_equal_with(&a.z, &CURVE_PARAMS.r_p));

    let xx = mont_pro(&a.x, &a.x);
    let yy = mont_pro(&a.y, &a.y);
    let mut s = mont_pro(&a.x, &yy);
    s = add_mod(&s, &s);
    s = add_mod(&s, &s);

    // m = 3x^2 + a = 3x^2 - 3
    let mut m = add_mod(&xx, &xx);
    m = add_mod(&m, &xx);
    m = sub_mod(&m, &THREE_R);

    let mut x3 = mont_pro(&m, &m);
    x3 = sub_mod(&x3, &s);
    x3 = sub_mod(&x3, &s);

    let y4 = mont_pro(&yy, &yy);
    let mut y3 = mont_pro(&m, &sub_mod(&s, &x3));
    let mut y8 = add_mod(&y4, &y4);
    y8 = add_mod(&y8, &y8);
    y8 = add_mod(&y8, &y8);
    y3 = sub_mod(&y3, &y8);

    let z3 = add_mod(&a.y, &a.y);

    Point { x: x3, y: y3, z: z3 }
}

/// 2007 Bernstein-Lange 11M + 5S addition. Raw formulas: no handling of
/// infinity or equal inputs; equal inputs produce z = 0.
pub(crate) fn point_add(a: &Point, b: &Point) -> Point {
    let z11 = mont_pro(&a.z, &a.z);
    let z22 = mont_pro(&b.z, &b.z);
    let u1 = mont_pro(&a.x, &z22);
    let u2 = mont_pro(&b.x, &z11);

    let mut s1 = mont_pro(&a.y, &b.z);
    s1 = mont_pro(&s1, &z22);
    let mut s2 = mont_pro(&b.y, &a.z);
    s2 = mont_pro(&s2, &z11);

    let h = sub_mod(&u2, &u1);
    let r = sub_mod(&s2, &s1);
    let r2 = mont_pro(&r, &r);
    let h2 = mont_pro(&h, &h);
    let h3 = mont_pro(&h2, &h);
    let u1h2 = mont_pro(&u1, &h2);

    let mut x3 = sub_mod(&r2, &h3);
    x3 = sub_mod(&x3, &u1h2);
    x3 = sub_mod(&x3, &u1h2);

    let mut y3 = mont_pro(&r, &sub_mod(&u1h2, &x3));
    y3 = sub_mod(&y3, &mont_pro(&s1, &h3));

    let mut z3 = mont_pro(&a.z, &b.z);
    z3 = mont_pro(&z3, &h);

    Point { x: x3, y: y3, z: z3 }
}

/// 2008 Giessmann mixed addition: `b` is affine in Montgomery form.
pub(crate) fn point_add_mixed(
    a: &Point,
    bx: &[Limb; LIMB_LENGTH],
    by: &[Limb; LIMB_LENGTH],
) -> Point {
    let mut t1 = mont_pro(&a.z, &a.z);
    let mut t2 = mont_pro(&t1, &a.z);
    t1 = mont_pro(&t1, bx);
    t2 = mont_pro(&t2, by);
    t1 = sub_mod(&a.x, &t1);
    t2 = sub_mod(&t2, &a.y);

    let z3 = mont_pro(&a.z, &t1);

    let mut t4 = mont_pro(&t1, &t1);
    t1 = mont_pro(&t1, &t4);
    t4 = mont_pro(&t4, &a.x);

    let mut x3 = mont_pro(&t2, &t2);
    x3 = add_mod(&x3, &t1);

    let mut y3 = mont_pro(&t1, &a.y);

    t1 = add_mod(&t4, &t4);
    x3 = sub_mod(&x3, &t1);
    t4 = sub_mod(&x3, &t4);
    t4 = mont_pro(&t4, &t2);
    y3 = sub_mod(&t4, &y3);

    Point { x: x3, y: y3, z: z3 }
}

/// Addition with the degenerate cases handled; used where the operands are
/// public values. Opposite points fall out of the raw formula as z = 0.
pub(crate) fn point_add_full(a: &Point, b: &Point) -> Point {
    if a.is_infinity() {
        return *b;
    }
    if b.is_infinity() {
        return *a;
    }
    if point_equal(a, b) {
        return point_double(a);
    }
    point_add(a, b)
}

/// Projective equality: x1*z2^2 == x2*z1^2 and y1*z2^3 == y2*z1^3.
pub(crate) fn point_equal(a: &Point, b: &Point) -> bool {
    let z11 = mont_pro(&a.z, &a.z);
    let z22 = mont_pro(&b.z, &b.z);
    let u1 = mont_pro(&a.x, &z22);
    let u2 = mont_pro(&b.x, &z11);
    if !norop_limbs_equal_with(&u1, &u2) {
        return false;
    }
    let s1 = mont_pro(&mont_pro(&a.y, &b.z), &z22);
    let s2 = mont_pro(&mont_pro(&b.y, &a.z), &z11);
    norop_limbs_equal_with(&s1, &s2)
}

#[inline]
pub(crate) fn limbs_cmov(
    dst: &mut [Limb; LIMB_LENGTH],
    src: &[Limb; LIMB_LENGTH],
    mask: Limb,
) {
    for i in 0..LIMB_LENGTH {
        dst[i] = (src[i] & mask) | (dst[i] & !mask);
    }
}

#[inline]
pub(crate) fn point_cmov(dst: &mut Point, src: &Point, mask: Limb) {
    limbs_cmov(&mut dst.x, &src.x, mask);
    limbs_cmov(&mut dst.y, &src.y, mask);
    limbs_cmov(&mut dst.z, &src.z, mask);
}

/// y = p - y where the mask is all ones.
#[inline]
pub(crate) fn neg_cond(y: &mut [Limb; LIMB_LENGTH], mask: Limb) {
    let neg = sub_mod(&[0; LIMB_LENGTH], y);
    limbs_cmov(y, &neg, mask);
}

/// One step of the windowed base-point walk, all flags applied branch-free:
/// `sign != 0` negates the table point, `sel == 0` keeps the accumulator,
/// `zero == 0` means the accumulator is still empty and the table point is
/// taken as-is.
pub(crate) fn point_add_affine_cond(
    acc: &Point,
    bx: &[Limb; LIMB_LENGTH],
    by: &[Limb; LIMB_LENGTH],
    sign: Limb,
    sel: Limb,
    zero: Limb,
) -> Point {
    let mut y2 = *by;
    neg_cond(&mut y2, limb_mask(sign));

    let mut r = point_add_mixed(acc, bx, &y2);

    let fresh = Point::from_affine(bx, &y2);
    point_cmov(&mut r, &fresh, !limb_mask(zero));
    point_cmov(&mut r, acc, !limb_mask(sel));
    r
}
