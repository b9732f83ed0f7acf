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
use crate::elem::{
    elem_reduced_to_scalar, elem_to_unencoded, scalar_add, twin_mul, Elem, Scalar,
};
use crate::err::Error;
use crate::jacobian::exchange::affine_from_jacobian;
use crate::key::public::PublicKey;
use crate::limb::{LIMB_BYTES, LIMB_LENGTH};
use crate::norop::{
    big_endian_from_limbs, norop_limbs_are_zero, norop_limbs_less_than, parse_big_endian,
};
use crate::sm2p256::CURVE_PARAMS;
use std::marker::PhantomData;

#[derive(Clone, Debug)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
    /// Which half of the field the nonce point's y landed in; lets a
    /// verifier recover the public key from the signature.
    flag: u8,
}

impl Signature {
    /// Builds a signature from big-endian r and s, rejecting values
    /// outside [1, n).
    pub fn new(r: &[u8], s: &[u8]) -> Result<Self, Error> {
        let mut rl = [0; LIMB_LENGTH];
        parse_big_endian(&mut rl, r).map_err(|_| Error::InvalidSignature)?;
        let mut sl = [0; LIMB_LENGTH];
        parse_big_endian(&mut sl, s).map_err(|_| Error::InvalidSignature)?;

        if norop_limbs_are_zero(&rl)
            || norop_limbs_are_zero(&sl)
            || !norop_limbs_less_than(&rl, &CURVE_PARAMS.n)
            || !norop_limbs_less_than(&sl, &CURVE_PARAMS.n)
        {
            return Err(Error::InvalidSignature);
        }

        Ok(Signature {
            r: Scalar {
                limbs: rl,
                m: PhantomData,
            },
            s: Scalar {
                limbs: sl,
                m: PhantomData,
            },
            flag: 0,
        })
    }

    /// r || s, 64 bytes.
    pub fn from_slice(sig: &[u8]) -> Result<Self, Error> {
        if sig.len() != 2 * LIMB_LENGTH * LIMB_BYTES {
            return Err(Error::InvalidSignature);
        }
        Self::new(
            &sig[..LIMB_LENGTH * LIMB_BYTES],
            &sig[LIMB_LENGTH * LIMB_BYTES..],
        )
    }

    pub(crate) fn from_scalars(r: Scalar, s: Scalar, flag: u8) -> Self {
        Signature { r, s, flag }
    }

    pub fn r(&self) -> [u8; LIMB_LENGTH * LIMB_BYTES] {
        let mut r_out = [0; LIMB_LENGTH * LIMB_BYTES];
        big_endian_from_limbs(&self.r.limbs, &mut r_out);
        r_out
    }

    pub fn s(&self) -> [u8; LIMB_LENGTH * LIMB_BYTES] {
        let mut s_out = [0; LIMB_LENGTH * LIMB_BYTES];
        big_endian_from_limbs(&self.s.limbs, &mut s_out);
        s_out
    }

    pub fn recovery_flag(&self) -> u8 {
        self.flag
    }

    /// `30 LL 02 Lr r 02 Ls s` with minimally-encoded integers.
    pub fn to_der(&self) -> Vec<u8> {
        fn trim(v: &[u8]) -> &[u8] {
            let mut start = 0;
            while start + 1 < v.len() && v[start] == 0 {
                start += 1;
            }
            &v[start..]
        }

        let r_full = self.r();
        let s_full = self.s();
        let r = trim(&r_full);
        let s = trim(&s_full);
        let r_pad = (r[0] >> 7) as usize;
        let s_pad = (s[0] >> 7) as usize;

        let mut out = Vec::with_capacity(6 + r.len() + r_pad + s.len() + s_pad);
        out.push(0x30);
        out.push((4 + r.len() + r_pad + s.len() + s_pad) as u8);
        out.push(0x02);
        out.push((r.len() + r_pad) as u8);
        if r_pad == 1 {
            out.push(0);
        }
        out.extend_from_slice(r);
        out.push(0x02);
        out.push((s.len() + s_pad) as u8);
        if s_pad == 1 {
            out.push(0);
        }
        out.extend_from_slice(s);
        out
    }

    /// Decodes the DER layout produced by [`to_der`], skipping any leading
    /// garbage before the sequence tag.
    pub fn from_der(sig: &[u8]) -> Result<Self, Error> {
        fn strip(v: &[u8]) -> &[u8] {
            let mut start = 0;
            while start + 1 < v.len() && v[start] == 0 {
                start += 1;
            }
            &v[start..]
        }

        let start = sig
            .iter()
            .position(|&b| b == 0x30)
            .ok_or(Error::InvalidSignature)?;
        let sig = &sig[start..];
        if sig.len() < 6 {
            return Err(Error::InvalidSignature);
        }
        if sig.len() < 2 + sig[1] as usize || sig[2] != 0x02 {
            return Err(Error::InvalidSignature);
        }

        let r_len = sig[3] as usize;
        if r_len == 0 || sig.len() < 6 + r_len {
            return Err(Error::InvalidSignature);
        }
        let r = &sig[4..4 + r_len];

        if sig[4 + r_len] != 0x02 {
            return Err(Error::InvalidSignature);
        }
        let s_len = sig[5 + r_len] as usize;
        if s_len == 0 || sig.len() < 6 + r_len + s_len {
            return Err(Error::InvalidSignature);
        }
        let s = &sig[6 + r_len..6 + r_len + s_len];

        Self::new(strip(r), strip(s))
    }

    pub fn verify(&self, pk: &PublicKey, msg: &[u8]) -> Result<(), Error> {
        let digest = signing_digest(pk, msg).map_err(|_| Error::InvalidSignature)?;
        self.verify_digest(pk, &digest)
    }

    /// Checks (e + x) mod n == r where (x, _) = [s]G + [r + s]Q.
    pub fn verify_digest(&self, pk: &PublicKey, digest: &[u8]) -> Result<(), Error> {
        let e = {
            let mut dl = [0; LIMB_LENGTH];
            parse_big_endian(&mut dl, digest).map_err(|_| Error::InvalidSignature)?;
            let edl = Elem {
                limbs: dl,
                m: PhantomData,
            };
            elem_reduced_to_scalar(&edl)
        };

        let t = scalar_add(&self.r, &self.s);
        if t.is_zero() {
            return Err(Error::InvalidSignature);
        }

        let point = twin_mul(&self.s, &t, pk);
        let (x_aff, _) = affine_from_jacobian(&point).map_err(|_| Error::InvalidSignature)?;
        let x = elem_reduced_to_scalar(&elem_to_unencoded(&x_aff));

        if scalar_add(&e, &x).is_equal(&self.r) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gmt_signature() -> Signature {
        Signature::new(
            &hex::decode("f5a03b0648d2c4630eeac513e1bb81a15944da3827d5b74143ac7eaceee720b3")
                .unwrap(),
            &hex::decode("b1b6aa29df212fd8763182bc0d421ca1bb9038fd1f7f42d4840b69c485bbc1aa")
                .unwrap(),
        )
        .unwrap()
    }

    fn gmt_public_key() -> PublicKey {
        PublicKey::from_bytes(
            &hex::decode(
                "0409f9df311e5421a150dd7d161e4bc5c672179fad1833fc076bb08ff356f35020\
                 ccea490ce26775a52dc6ea718cc1aa600aed05fbf35e084a6632f6072da9ad13",
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn verify_digest_known_answer_test() {
        let digest =
            hex::decode("f0b43e94ba45accaace692ed534382eb17e6ab5a19ce7b31f4486fdfc0d28640")
                .unwrap();
        gmt_signature()
            .verify_digest(&gmt_public_key(), &digest)
            .unwrap();

        // one flipped digest bit must fail
        let mut bad = digest.clone();
        bad[0] ^= 1;
        gmt_signature()
            .verify_digest(&gmt_public_key(), &bad)
            .unwrap_err();
    }

    #[test]
    fn rejects_out_of_range_scalars_test() {
        let n = hex::decode("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123")
            .unwrap();
        let one = [1u8];
        Signature::new(&n, &one).unwrap_err();
        Signature::new(&one, &n).unwrap_err();
        Signature::new(&[0u8; 32], &one).unwrap_err();
        Signature::new(&one, &[]).unwrap_err();
    }

    #[test]
    fn rejects_r_plus_s_zero_test() {
        // r = 1, s = n - 1: both in range but r + s = 0 mod n
        let n_minus_1 =
            hex::decode("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54122")
                .unwrap();
        let sig = Signature::new(&[1u8], &n_minus_1).unwrap();
        sig.verify_digest(&gmt_public_key(), &[0x12u8; 32])
            .unwrap_err();
    }

    #[test]
    fn der_round_trip_test() {
        let sig = gmt_signature();
        let der = sig.to_der();
        // r starts with 0xf5, so it carries a zero pad byte
        assert_eq!(&der[..5], &[0x30, 0x46, 0x02, 0x21, 0x00]);
        let decoded = Signature::from_der(&der).unwrap();
        assert_eq!(decoded.r(), sig.r());
        assert_eq!(decoded.s(), sig.s());
    }

    #[test]
    fn der_short_integers_test() {
        // tiny scalars shrink to single bytes on the wire
        let sig = Signature::new(&[0x01], &[0x7f]).unwrap();
        let der = sig.to_der();
        assert_eq!(der, vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x7f]);
        let decoded = Signature::from_der(&der).unwrap();
        assert_eq!(decoded.r(), sig.r());
        assert_eq!(decoded.s(), sig.s());
    }

    #[test]
    fn der_leading_garbage_test() {
        let sig = gmt_signature();
        let mut framed = vec![0x00, 0x01, 0x02];
        framed.extend_from_slice(&sig.to_der());
        let decoded = Signature::from_der(&framed).unwrap();
        assert_eq!(decoded.r(), sig.r());
    }

    #[test]
    fn der_malformed_test() {
        Signature::from_der(&[]).unwrap_err();
        Signature::from_der(&[0x30, 0x06, 0x02, 0x01]).unwrap_err();
        // integer tags have to be 0x02
        Signature::from_der(&[0x30, 0x06, 0x03, 0x01, 0x01, 0x02, 0x01, 0x7f]).unwrap_err();
        // truncated s
        Signature::from_der(&[0x30, 0x08, 0x02, 0x01, 0x01, 0x02, 0x03, 0x7f]).unwrap_err();
    }

    #[test]
    fn from_slice_test() {
        let sig = gmt_signature();
        let mut joined = [0u8; 64];
        joined[..32].copy_from_slice(&sig.r());
        joined[32..].copy_from_slice(&sig.s());
        let decoded = Signature::from_slice(&joined).unwrap();
        assert_eq!(decoded.r(), sig.r());
        Signature::from_slice(&joined[..63]).unwrap_err();
    }
}
