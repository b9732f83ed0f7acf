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

//! SM4-CBC convenience wrappers. The block cipher comes from `libsm`; this
//! module only adds the random IV framing: ciphertexts are IV || body.

use crate::err::Error;
use crate::rand::SecureRandom;
use libsm::sm4::{Cipher, Mode};

pub const SM4_BLOCK_SIZE: usize = 16;

pub fn sm4_encrypt_cbc(
    key: &[u8],
    plaintext: &[u8],
    rng: &mut dyn SecureRandom,
) -> Result<Vec<u8>, Error> {
    let mut iv = [0u8; SM4_BLOCK_SIZE];
    rng.fill(&mut iv)?;

    let cipher = Cipher::new(key, Mode::Cbc);
    let body = cipher.encrypt(plaintext, &iv);

    let mut out = Vec::with_capacity(SM4_BLOCK_SIZE + body.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn sm4_decrypt_cbc(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    if ciphertext.len() < 2 * SM4_BLOCK_SIZE {
        return Err(Error::InvalidCiphertext);
    }
    let (iv, body) = ciphertext.split_at(SM4_BLOCK_SIZE);
    let cipher = Cipher::new(key, Mode::Cbc);
    Ok(cipher.decrypt(body, iv))
}

#[cfg(test)]
mod test {
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

    #[test]
    fn sm4_cbc_round_trip_test() {
        let key = b"0123456789abcdef";
        let mut rng = EgRand(thread_rng());
        for len in &[0usize, 1, 15, 16, 17, 100] {
            let msg = vec![0x5au8; *len];
            let ct = sm4_encrypt_cbc(key, &msg, &mut rng).unwrap();
            assert!(ct.len() > msg.len());
            assert_eq!(sm4_decrypt_cbc(key, &ct).unwrap(), msg);
        }
    }

    #[test]
    fn sm4_cbc_distinct_ivs_test() {
        let key = b"0123456789abcdef";
        let mut rng = EgRand(thread_rng());
        let a = sm4_encrypt_cbc(key, b"same message", &mut rng).unwrap();
        let b = sm4_encrypt_cbc(key, b"same message", &mut rng).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sm4_cbc_truncated_test() {
        sm4_decrypt_cbc(b"0123456789abcdef", &[0u8; 16]).unwrap_err();
    }
}
