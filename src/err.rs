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

//! Error reporting.

/// The crate-level error type.
///
/// Verification deliberately reports every failure as
/// [`Error::InvalidSignature`]; a verifier learns nothing about which check
/// failed. Key and ciphertext decoding are more talkative because their
/// inputs are public.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The system random source failed, or produced an all-zero draw.
    /// Never retried silently.
    EntropyFailure,
    /// The bounded retry loop for degenerate signature components was
    /// exhausted.
    DegenerateSignature,
    /// The signature is malformed or does not verify.
    InvalidSignature,
    /// A key is malformed, out of range, or its point is not on the curve.
    InvalidKeyEncoding,
    /// A ciphertext is truncated, corrupted, or failed its integrity tag.
    InvalidCiphertext,
    /// The key derivation stream came out all zero.
    KdfFailure,
}

impl Error {
    pub fn description_(&self) -> &'static str {
        match self {
            Error::EntropyFailure => "EntropyFailure",
            Error::DegenerateSignature => "DegenerateSignature",
            Error::InvalidSignature => "InvalidSignature",
            Error::InvalidKeyEncoding => "InvalidKeyEncoding",
            Error::InvalidCiphertext => "InvalidCiphertext",
            Error::KdfFailure => "KdfFailure",
        }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.description_())
    }
}
