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

use crate::elem::{scalar_to_unencoded, Elem, Scalar, R};
use crate::err::Error;
use crate::jacobian::exchange::{
    big_endian_affine_from_jacobian, verify_affine_point_is_on_the_curve,
};
use crate::limb::{LIMB_BYTES, LIMB_LENGTH};
use crate::norop::{norop_limbs_less_than, parse_big_endian};
use crate::sm2p256::mult::base_point_mul;
use crate::sm2p256::point::Point;
use crate::sm2p256::{to_mont, CURVE_PARAMS};
use core::marker::PhantomData;

/// An uncompressed SM2 public key, `04 || X || Y`.
#[derive(Copy, Clone, Debug)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LEN],
}

impl PublicKey {
    pub fn new(x: &[u8; LIMB_LENGTH * LIMB_BYTES], y: &[u8; LIMB_LENGTH * LIMB_BYTES]) -> Self {
        let mut public = PublicKey {
            bytes: [0; PUBLIC_KEY_LEN],
        };
        public.bytes[0] = 4;
        public.bytes[1..1 + LIMB_LENGTH * LIMB_BYTES].copy_from_slice(x);
        public.bytes[1 + LIMB_LENGTH * LIMB_BYTES..].copy_from_slice(y);

        public
    }

    /// Decodes and validates an encoded key: tag, length, coordinate range
    /// and curve membership.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PUBLIC_KEY_LEN || bytes[0] != 4 {
            return Err(Error::InvalidKeyEncoding);
        }

        let mut x = [0; LIMB_LENGTH];
        parse_big_endian(&mut x, &bytes[1..1 + LIMB_LENGTH * LIMB_BYTES])?;
        let mut y = [0; LIMB_LENGTH];
        parse_big_endian(&mut y, &bytes[1 + LIMB_LENGTH * LIMB_BYTES..])?;
        if !norop_limbs_less_than(&x, &CURVE_PARAMS.p) || !norop_limbs_less_than(&y, &CURVE_PARAMS.p)
        {
            return Err(Error::InvalidKeyEncoding);
        }

        let x_aff = Elem::<R> {
            limbs: to_mont(&x),
            m: PhantomData,
        };
        let y_aff = Elem::<R> {
            limbs: to_mont(&y),
            m: PhantomData,
        };
        verify_affine_point_is_on_the_curve((&x_aff, &y_aff))?;

        let mut public = PublicKey {
            bytes: [0; PUBLIC_KEY_LEN],
        };
        public.bytes.copy_from_slice(bytes);
        Ok(public)
    }

    pub fn bytes_less_safe(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn to_point(&self) -> Point {
        let mut x = [0; LIMB_LENGTH];
        parse_big_endian(&mut x, &self.bytes[1..LIMB_LENGTH * LIMB_BYTES + 1]).unwrap();

        let mut y = [0; LIMB_LENGTH];
        parse_big_endian(&mut y, &self.bytes[LIMB_LENGTH * LIMB_BYTES + 1..]).unwrap();

        Point::from_affine(&to_mont(&x), &to_mont(&y))
    }

    pub fn public_from_private(d: &Scalar<R>) -> Result<PublicKey, Error> {
        let du = scalar_to_unencoded(d);
        let pk_point = base_point_mul(&du.limbs);
        let mut x = [0; LIMB_LENGTH * LIMB_BYTES];
        let mut y = [0; LIMB_LENGTH * LIMB_BYTES];

        big_endian_affine_from_jacobian(&mut x, &mut y, &pk_point)?;

        Ok(PublicKey::new(&x, &y))
    }
}

pub const PUBLIC_KEY_LEN: usize = 1 + (2 * LIMB_LENGTH * LIMB_BYTES);
