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

use crate::elem::Scalar;
use crate::err::Error;
use crate::limb::{LIMB_BYTES, LIMB_LENGTH};
use crate::norop::{norop_limbs_are_zero, norop_limbs_less_than, parse_big_endian};
use crate::rand::SecureRandom;
use crate::sm2p256::CURVE_PARAMS;
use core::marker::PhantomData;

/// Draws a scalar uniformly from [1, n - 1] by rejection sampling. An
/// all-zero draw means the random source is broken and is fatal rather
/// than retried.
pub(crate) fn create_private_key(rng: &mut dyn SecureRandom) -> Result<Scalar, Error> {
    let mut seed = [0; LIMB_LENGTH * LIMB_BYTES];
    let mut candidate = [0; LIMB_LENGTH];

    // XXX: The value 100 was chosen to match OpenSSL due to uncertainty of
    // what specific value would be better, but it seems bad to try 100 times.
    for _ in 0..100 {
        rng.fill(&mut seed)?;
        parse_big_endian(&mut candidate, &seed)?;

        if norop_limbs_are_zero(&candidate) {
            return Err(Error::EntropyFailure);
        }

        if norop_limbs_less_than(&candidate, &CURVE_PARAMS.n) {
            return Ok(Scalar {
                limbs: candidate,
                m: PhantomData,
            });
        }
    }

    Err(Error::EntropyFailure)
}

#[cfg(test)]
mod test {
    use super::*;

    struct FixedRand<'a>(pub &'a [u8]);

    impl SecureRandom for FixedRand<'_> {
        fn fill(&mut self, dest: &mut [u8]) -> Result<(), Error> {
            let (head, rest) = self.0.split_at(dest.len());
            dest.copy_from_slice(head);
            self.0 = rest;
            Ok(())
        }
    }

    #[test]
    fn all_zero_draw_is_fatal_test() {
        let zeros = [0u8; 32];
        let mut rng = FixedRand(&zeros);
        assert_eq!(create_private_key(&mut rng).unwrap_err(), Error::EntropyFailure);
    }

    #[test]
    fn over_order_draw_is_resampled_test() {
        // first draw is 2^256 - 1, above n, so the sampler retries;
        // second draw is 1
        let mut draws = [0u8; 64];
        for b in draws[..32].iter_mut() {
            *b = 0xff;
        }
        draws[63] = 0x01;
        let mut rng = FixedRand(&draws);
        let k = create_private_key(&mut rng).unwrap();
        assert_eq!(k.limbs, [1, 0, 0, 0]);
    }
}
