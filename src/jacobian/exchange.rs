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

//! Conversion back from Jacobian coordinates, with curve membership
//! verified on the way out.

use crate::elem::{elem_add, elem_mul, elem_to_unencoded, Elem, R};
use crate::err::Error;
use crate::limb::{LIMB_BYTES, LIMB_LENGTH};
use crate::norop::big_endian_from_limbs;
use crate::sm2p256::point::Point;
use crate::sm2p256::{invert, CURVE_PARAMS};
use core::marker::PhantomData;

pub fn big_endian_affine_from_jacobian(
    x_out: &mut [u8; LIMB_LENGTH * LIMB_BYTES],
    y_out: &mut [u8; LIMB_LENGTH * LIMB_BYTES],
    point: &Point,
) -> Result<(), Error> {
    let (x_aff, y_aff) = affine_from_jacobian(point)?;
    let x = elem_to_unencoded(&x_aff);
    big_endian_from_limbs(&x.limbs, x_out);
    let y = elem_to_unencoded(&y_aff);
    big_endian_from_limbs(&y.limbs, y_out);

    Ok(())
}

pub fn affine_from_jacobian(point: &Point) -> Result<(Elem<R>, Elem<R>), Error> {
    if point.is_infinity() {
        return Err(Error::InvalidKeyEncoding);
    }

    let z_inv = Elem::<R> {
        limbs: invert(&point.z),
        m: PhantomData,
    };
    let zz_inv = elem_mul(&z_inv, &z_inv);
    let zzz_inv = elem_mul(&z_inv, &zz_inv);

    let x = Elem::<R> {
        limbs: point.x,
        m: PhantomData,
    };
    let y = Elem::<R> {
        limbs: point.y,
        m: PhantomData,
    };
    let x_aff = elem_mul(&x, &zz_inv);
    let y_aff = elem_mul(&y, &zzz_inv);

    verify_affine_point_is_on_the_curve((&x_aff, &y_aff))?;

    Ok((x_aff, y_aff))
}

pub fn verify_affine_point_is_on_the_curve((x, y): (&Elem<R>, &Elem<R>)) -> Result<(), Error> {
    let a = Elem::<R> {
        limbs: CURVE_PARAMS.a_mont,
        m: PhantomData,
    };
    let b = Elem::<R> {
        limbs: CURVE_PARAMS.b_mont,
        m: PhantomData,
    };

    let lhs = elem_mul(y, y);

    let x2 = elem_mul(x, x);
    let x2_a = elem_add(&x2, &a);
    let x2_a_x = elem_mul(&x2_a, x);
    let rhs = elem_add(&x2_a_x, &b);

    if !lhs.is_equal(&rhs) {
        return Err(Error::InvalidKeyEncoding);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sm2p256::mult::base_point;
    use crate::sm2p256::point::{point_double, Point};

    #[test]
    fn affine_round_trip_test() {
        // doubling G twice and converting back must land on the curve
        let p = point_double(&point_double(&base_point()));
        let mut x = [0u8; LIMB_LENGTH * LIMB_BYTES];
        let mut y = [0u8; LIMB_LENGTH * LIMB_BYTES];
        big_endian_affine_from_jacobian(&mut x, &mut y, &p).unwrap();
    }

    #[test]
    fn infinity_rejected_test() {
        affine_from_jacobian(&Point::zero()).unwrap_err();
    }

    #[test]
    fn off_curve_rejected_test() {
        let mut p = base_point();
        p.x = p.y;
        affine_from_jacobian(&p).unwrap_err();
    }
}
