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

//! SM3-based digests: the plain hash, the two-stage signing digest with the
//! signer's identity, and the counter-mode key derivation used by the
//! public-key cipher. The compression function itself comes from `libsm`.

use crate::err::Error;
use crate::key::public::PublicKey;
use libsm::sm2::signature::SigCtx;
use libsm::sm3::hash::Sm3Hash;

/// The identity everyone uses unless a protocol says otherwise.
pub const SM2_DEFAULT_ID: &str = "1234567812345678";

pub fn sm3_hash(data: &[u8]) -> [u8; 32] {
    let mut hash = Sm3Hash::new(data);
    hash.get_hash()
}

/// e = SM3(ZA || msg) with ZA bound to the signer's public key and the
/// default identity.
pub(crate) fn signing_digest(pk: &PublicKey, message: &[u8]) -> Result<[u8; 32], Error> {
    let ctx = SigCtx::new();
    let pk_point = ctx
        .load_pubkey(pk.bytes_less_safe())
        .map_err(|_| Error::InvalidKeyEncoding)?;
    Ok(ctx.hash(SM2_DEFAULT_ID, &pk_point, message))
}

/// SM3 in counter mode over x || y || counter. Returns the stream and
/// whether any byte of it was non-zero; an all-zero stream is unusable.
pub(crate) fn kdf(x: &[u8], y: &[u8], length: usize) -> (Vec<u8>, bool) {
    let mut stream = Vec::with_capacity(length);
    let rounds = (length + 31) / 32;
    for ct in 1..=rounds as u32 {
        let mut buf = Vec::with_capacity(x.len() + y.len() + 4);
        buf.extend_from_slice(x);
        buf.extend_from_slice(y);
        buf.extend_from_slice(&ct.to_be_bytes());
        let block = sm3_hash(&buf);
        let take = (length - stream.len()).min(32);
        stream.extend_from_slice(&block[..take]);
    }
    let usable = stream.iter().any(|&b| b != 0);
    (stream, usable)
}
