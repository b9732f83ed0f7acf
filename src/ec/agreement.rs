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

//! SM2 key exchange (GB/T 32918.3). Both parties run
//! [`generate_shared_key`] with their own long-term and ephemeral keys plus
//! the peer's public values, and arrive at the same point and Z material.

use crate::curve::sm2_curve;
use crate::digest::sm3_hash;
use crate::err::Error;
use num_bigint::BigUint;

// big-endian a = p - 3, part of the Z identity hash preimage
const CURVE_A_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xfc,
];

/// Derives the shared point (x, y) and the Z byte string
/// `x || y || Z_initiator || Z_responder`.
///
/// `rand_a` is this party's ephemeral private scalar, `rb` the peer's
/// ephemeral public point. The caller feeds Z into a KDF of its choosing
/// to produce the session key.
#[allow(clippy::too_many_arguments)]
pub fn generate_shared_key(
    id_a: &[u8],
    id_b: &[u8],
    rand_a: &[u8],
    private_key: &BigUint,
    public_a: (&BigUint, &BigUint),
    public_b: (&BigUint, &BigUint),
    rb: (&BigUint, &BigUint),
    is_initiator: bool,
) -> Result<(BigUint, BigUint, Vec<u8>), Error> {
    let curve = sm2_curve();
    let two_w = BigUint::from(1u32) << 127;
    let w_mask = &two_w - BigUint::from(1u32);

    // x-bar = 2^w + (x mod 2^w), w = 127
    let (rax, _ray) = curve.scalar_base_mult(rand_a)?;
    let x1 = &two_w + (&rax & &w_mask);

    let ta = (private_key + x1 * BigUint::from_bytes_be(rand_a)) % &curve.n;

    if !curve.is_on_curve(rb.0, rb.1) {
        return Err(Error::InvalidKeyEncoding);
    }
    let x2 = &two_w + (rb.0 & &w_mask);

    let (vx, vy) = curve.scalar_mult(rb.0, rb.1, &x2.to_bytes_be())?;
    let (vx, vy) = curve.add(&vx, &vy, public_b.0, public_b.1)?;
    let (vx, vy) = curve.scalar_mult(&vx, &vy, &ta.to_bytes_be())?;

    let za = ident_hash(id_a, public_a);
    let zb = ident_hash(id_b, public_b);

    let mut z = Vec::new();
    z.extend_from_slice(&vx.to_bytes_be());
    z.extend_from_slice(&vy.to_bytes_be());
    if is_initiator {
        z.extend_from_slice(&za);
        z.extend_from_slice(&zb);
    } else {
        z.extend_from_slice(&zb);
        z.extend_from_slice(&za);
    }

    Ok((vx, vy, z))
}

/// Z = SM3(ENTL || id || a || b || gx || gy || px || py)
fn ident_hash(id: &[u8], public: (&BigUint, &BigUint)) -> [u8; 32] {
    let curve = sm2_curve();
    let entl = (id.len() * 8) as u16;

    let mut buf = Vec::new();
    buf.extend_from_slice(&entl.to_be_bytes());
    buf.extend_from_slice(id);
    buf.extend_from_slice(&CURVE_A_BYTES);
    buf.extend_from_slice(&curve.b.to_bytes_be());
    buf.extend_from_slice(&curve.gx.to_bytes_be());
    buf.extend_from_slice(&curve.gy.to_bytes_be());
    buf.extend_from_slice(&public.0.to_bytes_be());
    buf.extend_from_slice(&public.1.to_bytes_be());
    sm3_hash(&buf)
}
