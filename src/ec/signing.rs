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

use crate::digest::signing_digest;
use crate::ec::verification::Signature;
use crate::elem::{
    elem_reduced_to_scalar, elem_to_unencoded, scalar_add, scalar_inv_to_mont, scalar_mul,
    scalar_sub, scalar_to_unencoded, Elem, Scalar, R,
};
use crate::err::Error;
use crate::jacobian::exchange::affine_from_jacobian;
use crate::key::private::create_private_key;
use crate::key::public::PublicKey;
use crate::limb::{LIMB_LENGTH, ONE};
use crate::norop::{norop_limbs_are_zero, norop_limbs_less_than, norop_sub_pure, parse_big_endian};
use crate::rand::SecureRandom;
use crate::sm2p256::mult::base_point_mul;
use crate::sm2p256::{scalar_to_mont, CURVE_PARAMS};
use core::marker::PhantomData;

#[derive(Debug)]
pub struct KeyPair {
    d: Scalar<R>, // *R*
}

impl KeyPair {
    /// Accepts a big-endian private key of at most 32 bytes; shorter input
    /// is left-padded. The value must lie in [1, n - 2]: the upper bound
    /// keeps 1 + d invertible during signing.
    pub fn new(private_key: &[u8]) -> Result<Self, Error> {
        let mut key_limb = [0; LIMB_LENGTH];
        parse_big_endian(&mut key_limb, private_key)?;

        let mut n_minus_1 = CURVE_PARAMS.n;
        n_minus_1[0] -= 1;
        if norop_limbs_are_zero(&key_limb) || !norop_limbs_less_than(&key_limb, &n_minus_1) {
            return Err(Error::InvalidKeyEncoding);
        }

        let d = Scalar {
            limbs: scalar_to_mont(&key_limb),
            m: PhantomData,
        };
        Ok(KeyPair { d })
    }

    pub fn generate(rng: &mut dyn SecureRandom) -> Result<Self, Error> {
        let d = create_private_key(rng)?;
        Ok(KeyPair {
            d: Scalar {
                limbs: scalar_to_mont(&d.limbs),
                m: PhantomData,
            },
        })
    }

    pub(crate) fn private_scalar(&self) -> Scalar {
        scalar_to_unencoded(&self.d)
    }

    pub fn public_from_private(&self) -> Result<PublicKey, Error> {
        PublicKey::public_from_private(&self.d)
    }

    pub fn sign(&self, rng: &mut dyn SecureRandom, message: &[u8]) -> Result<Signature, Error> {
        let digest = signing_digest(&self.public_from_private()?, message)?;
        self.sign_digest(rng, &digest)
    }

    /// Signs a precomputed 32-byte digest.
    pub fn sign_digest(
        &self,
        rng: &mut dyn SecureRandom,
        digest: &[u8],
    ) -> Result<Signature, Error> {
        let e = {
            let mut dl = [0; LIMB_LENGTH];
            parse_big_endian(&mut dl, digest)?;
            let edl = Elem {
                limbs: dl,
                m: PhantomData,
            };
            elem_reduced_to_scalar(&edl)
        };

        static SCALAR_ONE: Scalar = Scalar {
            limbs: ONE,
            m: PhantomData,
        };

        for _ in 0..100 {
            let rk = create_private_key(rng)?;

            let rq = base_point_mul(&rk.limbs);
            let (x1, y1) = affine_from_jacobian(&rq)?;

            let r = {
                let x = elem_to_unencoded(&x1);
                scalar_add(&elem_reduced_to_scalar(&x), &e)
            };
            if r.is_zero() {
                continue;
            }
            if scalar_add(&r, &rk).is_zero() {
                continue;
            }

            // which half of the field y1 landed in, for public key recovery
            let flag = {
                let y = elem_to_unencoded(&y1);
                let mut neg = [0; LIMB_LENGTH];
                let _ = norop_sub_pure(&mut neg, &CURVE_PARAMS.p, &y.limbs);
                norop_limbs_less_than(&neg, &y.limbs) as u8
            };

            let da_ue = scalar_to_unencoded(&self.d);
            let left = scalar_inv_to_mont(&scalar_add(&da_ue, &SCALAR_ONE));
            let dr = scalar_mul(&self.d, &r);
            let right = scalar_sub(&rk, &dr);
            let s = scalar_mul(&left, &right);
            if s.is_zero() {
                continue;
            }

            return Ok(Signature::from_scalars(r, s, flag));
        }
        Err(Error::DegenerateSignature)
    }
}
