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

//! Chinese national (GM) cryptography: SM2 signatures, public-key
//! encryption and key exchange over the SM2 256-bit prime curve, with SM3
//! hashing and SM4-CBC symmetric helpers.

#![deny(
unused_qualifications,
variant_size_differences,
)]
#![forbid(
anonymous_parameters,
trivial_casts,
trivial_numeric_casts,
unused_extern_crates,
unused_import_braces,
)]

mod curve;
mod digest;
mod ec;
mod elem;
mod err;
mod jacobian;
mod key;
pub mod limb;
mod norop;
mod rand;
mod sm2p256;
mod sm4;

pub use crate::rand::{SecureRandom, SystemRandom};
pub use curve::{sm2_curve, Curve};
pub use digest::{sm3_hash, SM2_DEFAULT_ID};
pub use ec::agreement::generate_shared_key;
pub use ec::encryption::{decrypt, encrypt};
pub use ec::{KeyPair, Signature};
pub use err::Error;
pub use key::public::PublicKey;
pub use sm4::{sm4_decrypt_cbc, sm4_encrypt_cbc};
