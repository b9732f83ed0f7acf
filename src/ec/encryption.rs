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

//! SM2 public-key encryption, C1 || C2 || C3 layout:
//! `04 || x1 || y1 || (data xor KDF(x2 || y2)) || SM3(x2 || data || y2)`.

use crate::digest::{kdf, sm3_hash};
use crate::ec::signing::KeyPair;
use crate::elem::{Elem, R};
use crate::err::Error;
use crate::jacobian::exchange::{
    big_endian_affine_from_jacobian, verify_affine_point_is_on_the_curve,
};
use crate::key::private::create_private_key;
use crate::key::public::PublicKey;
use crate::limb::{LIMB_BYTES, LIMB_LENGTH};
use crate::norop::{norop_limbs_less_than, parse_big_endian};
use crate::rand::SecureRandom;
use crate::sm2p256::mult::{base_point_mul, point_mul};
use crate::sm2p256::point::Point;
use crate::sm2p256::{to_mont, CURVE_PARAMS};
use core::marker::PhantomData;

const COORD_LEN: usize = LIMB_LENGTH * LIMB_BYTES;
const OVERHEAD: usize = 1 + 2 * COORD_LEN + 32;

pub fn encrypt(pk: &PublicKey, data: &[u8], rng: &mut dyn SecureRandom) -> Result<Vec<u8>, Error> {
    let k = create_private_key(rng)?;

    let kg = base_point_mul(&k.limbs);
    let mut x1 = [0u8; COORD_LEN];
    let mut y1 = [0u8; COORD_LEN];
    big_endian_affine_from_jacobian(&mut x1, &mut y1, &kg)?;

    let kp = point_mul(&pk.to_point(), &k.limbs);
    let mut x2 = [0u8; COORD_LEN];
    let mut y2 = [0u8; COORD_LEN];
    big_endian_affine_from_jacobian(&mut x2, &mut y2, &kp)?;

    let (mut body, usable) = kdf(&x2, &y2, data.len());
    if !usable {
        return Err(Error::KdfFailure);
    }

    let tag = {
        let mut buf = Vec::with_capacity(2 * COORD_LEN + data.len());
        buf.extend_from_slice(&x2);
        buf.extend_from_slice(data);
        buf.extend_from_slice(&y2);
        sm3_hash(&buf)
    };

    for (c, d) in body.iter_mut().zip(data.iter()) {
        *c ^= d;
    }

    let mut out = Vec::with_capacity(OVERHEAD + data.len());
    out.push(0x04);
    out.extend_from_slice(&x1);
    out.extend_from_slice(&y1);
    out.extend_from_slice(&body);
    out.extend_from_slice(&tag);
    Ok(out)
}

pub fn decrypt(key_pair: &KeyPair, data: &[u8]) -> Result<Vec<u8>, Error> {
    if data.len() < OVERHEAD || data[0] != 0x04 {
        return Err(Error::InvalidCiphertext);
    }
    let body = &data[1..];
    let length = body.len() - 2 * COORD_LEN - 32;

    let c1 = decode_c1(&body[..2 * COORD_LEN])?;

    let d = key_pair.private_scalar();
    let shared = point_mul(&c1, &d.limbs);
    let mut x2 = [0u8; COORD_LEN];
    let mut y2 = [0u8; COORD_LEN];
    big_endian_affine_from_jacobian(&mut x2, &mut y2, &shared)
        .map_err(|_| Error::InvalidCiphertext)?;

    let (mut plain, usable) = kdf(&x2, &y2, length);
    if !usable {
        return Err(Error::KdfFailure);
    }
    for (p, c) in plain.iter_mut().zip(body[2 * COORD_LEN..].iter()) {
        *p ^= c;
    }

    let tag = {
        let mut buf = Vec::with_capacity(2 * COORD_LEN + length);
        buf.extend_from_slice(&x2);
        buf.extend_from_slice(&plain);
        buf.extend_from_slice(&y2);
        sm3_hash(&buf)
    };
    let mut diff = 0u8;
    for (a, b) in tag.iter().zip(body[2 * COORD_LEN + length..].iter()) {
        diff |= a ^ b;
    }
    if diff != 0 {
        return Err(Error::InvalidCiphertext);
    }

    Ok(plain)
}

/// Decodes and validates the ephemeral point at the front of a ciphertext.
fn decode_c1(encoded: &[u8]) -> Result<Point, Error> {
    let mut x = [0; LIMB_LENGTH];
    parse_big_endian(&mut x, &encoded[..COORD_LEN]).map_err(|_| Error::InvalidCiphertext)?;
    let mut y = [0; LIMB_LENGTH];
    parse_big_endian(&mut y, &encoded[COORD_LEN..]).map_err(|_| Error::InvalidCiphertext)?;
    if !norop_limbs_less_than(&x, &CURVE_PARAMS.p) || !norop_limbs_less_than(&y, &CURVE_PARAMS.p) {
        return Err(Error::InvalidCiphertext);
    }

    let x_aff = Elem::<R> {
        limbs: to_mont(&x),
        m: PhantomData,
    };
    let y_aff = Elem::<R> {
        limbs: to_mont(&y),
        m: PhantomData,
    };
    verify_affine_point_is_on_the_curve((&x_aff, &y_aff))
        .map_err(|_| Error::InvalidCiphertext)?;

    Ok(Point::from_affine(&x_aff.limbs, &y_aff.limbs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::ThreadRng;
    use rand::{thread_rng, RngCore};

    struct EgRand(ThreadRng);

    impl SecureRandom for EgRand {
        fn fill(&mut self, dest: &mut [u8]) -> Result<(), Error> {
            self.0.fill_bytes(dest);
            Ok(())
        }
    }

    fn test_key_pair() -> KeyPair {
        KeyPair::new(
            &hex::decode("6332a6b9f834f5c25df0555ff84b2c0cd278f42457bb95534faa4bae0608f537")
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn encrypt_decrypt_round_trip_test() {
        let key_pair = test_key_pair();
        let pk = key_pair.public_from_private().unwrap();
        let mut rng = EgRand(thread_rng());

        for msg in &[&b"a"[..], &b"hello world"[..], &[0u8; 200][..]] {
            let ct = encrypt(&pk, msg, &mut rng).unwrap();
            assert_eq!(ct.len(), OVERHEAD + msg.len());
            assert_eq!(ct[0], 0x04);
            assert_eq!(decrypt(&key_pair, &ct).unwrap(), *msg);
        }
    }

    #[test]
    fn ciphertexts_are_randomized_test() {
        let key_pair = test_key_pair();
        let pk = key_pair.public_from_private().unwrap();
        let mut rng = EgRand(thread_rng());
        let a = encrypt(&pk, b"same message", &mut rng).unwrap();
        let b = encrypt(&pk, b"same message", &mut rng).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_ciphertext_rejected_test() {
        let key_pair = test_key_pair();
        let pk = key_pair.public_from_private().unwrap();
        let mut rng = EgRand(thread_rng());
        let ct = encrypt(&pk, b"attack at dawn", &mut rng).unwrap();

        // flip a body byte
        let mut bad = ct.clone();
        bad[1 + 64] ^= 1;
        decrypt(&key_pair, &bad).unwrap_err();

        // flip a tag byte
        let mut bad = ct.clone();
        let last = bad.len() - 1;
        bad[last] ^= 1;
        decrypt(&key_pair, &bad).unwrap_err();

        // truncation and a bad frame tag
        decrypt(&key_pair, &ct[..OVERHEAD - 1]).unwrap_err();
        let mut bad = ct;
        bad[0] = 0x02;
        decrypt(&key_pair, &bad).unwrap_err();
    }

    #[test]
    fn wrong_key_rejected_test() {
        let key_pair = test_key_pair();
        let pk = key_pair.public_from_private().unwrap();
        let mut rng = EgRand(thread_rng());
        let ct = encrypt(&pk, b"for your eyes only", &mut rng).unwrap();

        let other = KeyPair::new(&[7u8; 32]).unwrap();
        decrypt(&other, &ct).unwrap_err();
    }
}
