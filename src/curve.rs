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

//! A big-integer view of the SM2 curve for protocol code (key agreement
//! and friends). Coordinates cross this boundary as `BigUint`; all the
//! group arithmetic still runs on the limb engine underneath. The point at
//! infinity is (0, 0) here.

use crate::err::Error;
use crate::jacobian::exchange::big_endian_affine_from_jacobian;
use crate::limb::{Limb, LIMB_BYTES, LIMB_LENGTH};
use crate::norop::{norop_limbs_are_zero, parse_big_endian};
use crate::sm2p256::mult::{base_point_mul, point_mul};
use crate::sm2p256::point::{point_add_full, point_double_z1, Point};
use crate::sm2p256::to_mont;
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::OnceLock;

pub struct Curve {
    pub p: BigUint,
    pub n: BigUint,
    pub b: BigUint,
    pub gx: BigUint,
    pub gy: BigUint,
    pub bit_size: usize,
}

static SM2_CURVE: OnceLock<Curve> = OnceLock::new();

/// The process-wide SM2 curve instance.
pub fn sm2_curve() -> &'static Curve {
    SM2_CURVE.get_or_init(|| Curve {
        p: biguint_from_hex("fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff"),
        n: biguint_from_hex("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123"),
        b: biguint_from_hex("28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93"),
        gx: biguint_from_hex("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7"),
        gy: biguint_from_hex("bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0"),
        bit_size: 256,
    })
}

fn biguint_from_hex(s: &str) -> BigUint {
    // only called on the fixed curve constants
    BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
}

impl Curve {
    /// y^2 = x^3 - 3x + b, with both coordinates in range. (0, 0) is the
    /// infinity encoding, not a curve point.
    pub fn is_on_curve(&self, x: &BigUint, y: &BigUint) -> bool {
        if x >= &self.p || y >= &self.p {
            return false;
        }
        let a = &self.p - BigUint::from(3u32);
        let lhs = y * y % &self.p;
        let rhs = ((x * x + a) % &self.p * x + &self.b) % &self.p;
        lhs == rhs
    }

    pub fn add(
        &self,
        x1: &BigUint,
        y1: &BigUint,
        x2: &BigUint,
        y2: &BigUint,
    ) -> Result<(BigUint, BigUint), Error> {
        let a = self.point_from_affine(x1, y1)?;
        let b = self.point_from_affine(x2, y2)?;
        self.affine_coords(&point_add_full(&a, &b))
    }

    pub fn double(&self, x: &BigUint, y: &BigUint) -> Result<(BigUint, BigUint), Error> {
        let p = self.point_from_affine(x, y)?;
        if p.is_infinity() {
            return Ok((BigUint::zero(), BigUint::zero()));
        }
        self.affine_coords(&point_double_z1(&p))
    }

    /// [k]P with k an arbitrary big-endian byte string, reduced mod n.
    pub fn scalar_mult(
        &self,
        x: &BigUint,
        y: &BigUint,
        k: &[u8],
    ) -> Result<(BigUint, BigUint), Error> {
        let p = self.point_from_affine(x, y)?;
        let scalar = self.reduced_scalar(k)?;
        if norop_limbs_are_zero(&scalar) {
            return Ok((BigUint::zero(), BigUint::zero()));
        }
        self.affine_coords(&point_mul(&p, &scalar))
    }

    /// [k]G with k an arbitrary big-endian byte string, reduced mod n.
    pub fn scalar_base_mult(&self, k: &[u8]) -> Result<(BigUint, BigUint), Error> {
        let scalar = self.reduced_scalar(k)?;
        if norop_limbs_are_zero(&scalar) {
            return Ok((BigUint::zero(), BigUint::zero()));
        }
        self.affine_coords(&base_point_mul(&scalar))
    }

    fn reduced_scalar(&self, k: &[u8]) -> Result<[Limb; LIMB_LENGTH], Error> {
        let reduced = BigUint::from_bytes_be(k) % &self.n;
        let mut limbs = [0; LIMB_LENGTH];
        parse_big_endian(&mut limbs, &reduced.to_bytes_be())?;
        Ok(limbs)
    }

    fn point_from_affine(&self, x: &BigUint, y: &BigUint) -> Result<Point, Error> {
        if x.is_zero() && y.is_zero() {
            return Ok(Point::zero());
        }
        if x >= &self.p || y >= &self.p {
            return Err(Error::InvalidKeyEncoding);
        }
        let mut xl = [0; LIMB_LENGTH];
        parse_big_endian(&mut xl, &x.to_bytes_be())?;
        let mut yl = [0; LIMB_LENGTH];
        parse_big_endian(&mut yl, &y.to_bytes_be())?;
        Ok(Point::from_affine(&to_mont(&xl), &to_mont(&yl)))
    }

    fn affine_coords(&self, p: &Point) -> Result<(BigUint, BigUint), Error> {
        if p.is_infinity() {
            return Ok((BigUint::zero(), BigUint::zero()));
        }
        let mut x = [0u8; LIMB_LENGTH * LIMB_BYTES];
        let mut y = [0u8; LIMB_LENGTH * LIMB_BYTES];
        big_endian_affine_from_jacobian(&mut x, &mut y, p)?;
        Ok((BigUint::from_bytes_be(&x), BigUint::from_bytes_be(&y)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generator_on_curve_test() {
        let curve = sm2_curve();
        assert!(curve.is_on_curve(&curve.gx, &curve.gy));
        assert!(!curve.is_on_curve(&curve.gx, &curve.gx));
    }

    #[test]
    fn add_double_agree_test() {
        let curve = sm2_curve();
        let g2a = curve.double(&curve.gx, &curve.gy).unwrap();
        let g2b = curve
            .scalar_base_mult(&BigUint::from(2u32).to_bytes_be())
            .unwrap();
        assert_eq!(g2a, g2b);

        let g3a = curve.add(&g2a.0, &g2a.1, &curve.gx, &curve.gy).unwrap();
        let g3b = curve
            .scalar_base_mult(&BigUint::from(3u32).to_bytes_be())
            .unwrap();
        assert_eq!(g3a, g3b);
    }

    #[test]
    fn scalar_mult_agrees_with_base_mult_test() {
        let curve = sm2_curve();
        let k = BigUint::from(5_201_314u32).to_bytes_be();
        let via_base = curve.scalar_base_mult(&k).unwrap();
        let via_point = curve.scalar_mult(&curve.gx, &curve.gy, &k).unwrap();
        assert_eq!(via_base, via_point);
        assert!(curve.is_on_curve(&via_base.0, &via_base.1));
    }

    #[test]
    fn infinity_conventions_test() {
        let curve = sm2_curve();
        let zero = BigUint::zero();
        // G + 0 = G
        let sum = curve.add(&curve.gx, &curve.gy, &zero, &zero).unwrap();
        assert_eq!(sum, (curve.gx.clone(), curve.gy.clone()));
        // [n]G = infinity
        let at_infinity = curve.scalar_base_mult(&curve.n.to_bytes_be()).unwrap();
        assert_eq!(at_infinity, (zero.clone(), zero));
    }

    #[test]
    fn affine_coords_plain_form_test() {
        // GB/T 32918.5 appendix A key pair; coordinates must come out in
        // plain form, not as Montgomery residues
        let curve = sm2_curve();
        let d = biguint_from_hex(
            "3945208f7b2144b13f36e38ac6d39f95889393692860b51a42fb81ef4df7c5b8",
        );
        let (x, y) = curve.scalar_base_mult(&d.to_bytes_be()).unwrap();
        assert_eq!(
            x,
            biguint_from_hex("09f9df311e5421a150dd7d161e4bc5c672179fad1833fc076bb08ff356f35020")
        );
        assert_eq!(
            y,
            biguint_from_hex("ccea490ce26775a52dc6ea718cc1aa600aed05fbf35e084a6632f6072da9ad13")
        );
    }

    #[test]
    fn scalar_reduction_test() {
        let curve = sm2_curve();
        // k and k + n multiply to the same point
        let k = BigUint::from(0xdead_beefu32);
        let shifted = &k + &curve.n;
        assert_eq!(
            curve.scalar_base_mult(&k.to_bytes_be()).unwrap(),
            curve.scalar_base_mult(&shifted.to_bytes_be()).unwrap()
        );
    }
}
