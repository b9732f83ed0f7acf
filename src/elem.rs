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

//! Field and scalar elements with their Montgomery encoding tracked in the
//! type, so a product's encoding is decided at compile time.

use crate::key::public::PublicKey;
use crate::limb::{Limb, LIMB_LENGTH, ONE};
use crate::norop::{norop_limbs_equal_with, norop_limbs_less_than};
use crate::sm2p256::mult::{base_point_mul, point_mul};
use crate::sm2p256::point::{point_add_full, Point};
use crate::sm2p256::{
    add_mod, mont_pro, scalar_add_mod, scalar_inv, scalar_mont_pro, scalar_sub_mod, CURVE_PARAMS,
};
use core::marker::PhantomData;

// Indicates that the element is not encoded; there is no *R* factor
// that needs to be canceled out.
#[derive(Copy, Clone, Debug)]
pub enum Unencoded {}

// Indicates that the element is encoded; the value has one *R*
// factor that needs to be canceled out.
#[derive(Copy, Clone, Debug)]
pub enum R {}

pub trait Encoding {}

impl Encoding for R {}
impl Encoding for Unencoded {}

/// The encoding of the result of a reduction.
pub trait ReductionEncoding {
    type Output: Encoding;
}

impl ReductionEncoding for R {
    type Output = Unencoded;
}

/// The encoding of the result of a multiplication.
pub trait ProductEncoding {
    type Output: Encoding;
}

impl<E: ReductionEncoding> ProductEncoding for (Unencoded, E) {
    type Output = E::Output;
}

impl<E: Encoding> ProductEncoding for (R, E) {
    type Output = E;
}

/// Elements are always fully reduced with respect to *m*; i.e.
/// the 0 <= x < m for every value x.
#[derive(Clone, Copy, Debug)]
pub struct Elem<M> {
    pub limbs: [Limb; LIMB_LENGTH],

    /// The modulus *m* for the ring ℤ/mℤ for which this element is a value.
    pub m: PhantomData<M>,
}

impl<M> Elem<M> {
    pub fn is_zero(&self) -> bool {
        norop_limbs_equal_with(&self.limbs, &[0; LIMB_LENGTH])
    }

    pub fn is_equal(&self, other: &Elem<M>) -> bool {
        norop_limbs_equal_with(&self.limbs, &other.limbs)
    }
}

pub fn elem_mul<EA: Encoding, EB: Encoding>(
    a: &Elem<EA>,
    b: &Elem<EB>,
) -> Elem<<(EA, EB) as ProductEncoding>::Output>
where
    (EA, EB): ProductEncoding,
{
    Elem {
        limbs: mont_pro(&a.limbs, &b.limbs),
        m: PhantomData,
    }
}

pub fn elem_add(a: &Elem<R>, b: &Elem<R>) -> Elem<R> {
    Elem {
        limbs: add_mod(&a.limbs, &b.limbs),
        m: PhantomData,
    }
}

pub fn elem_to_unencoded(a: &Elem<R>) -> Elem<Unencoded> {
    Elem {
        limbs: mont_pro(&a.limbs, &ONE),
        m: PhantomData,
    }
}

/// Reduces a fully-reduced field element into the scalar ring. Since
/// n < p < 2n, at most one subtraction is needed.
pub fn elem_reduced_to_scalar(e: &Elem<Unencoded>) -> Scalar {
    if norop_limbs_less_than(&e.limbs, &CURVE_PARAMS.n) {
        Scalar {
            limbs: e.limbs,
            m: PhantomData,
        }
    } else {
        Scalar {
            limbs: scalar_sub_mod(&e.limbs, &CURVE_PARAMS.n),
            m: PhantomData,
        }
    }
}

/// A scalar. Its value is in [0, n). Zero-valued scalars are forbidden in most
/// contexts.
pub type Scalar<N = Unencoded> = Elem<N>;

pub fn scalar_inv_to_mont(a: &Scalar) -> Scalar<R> {
    assert!(!norop_limbs_equal_with(&a.limbs, &[0; LIMB_LENGTH]));

    Scalar {
        limbs: scalar_inv(&a.limbs),
        m: PhantomData,
    }
}

pub fn scalar_to_unencoded(a: &Scalar<R>) -> Scalar {
    Scalar {
        limbs: scalar_mont_pro(&a.limbs, &ONE),
        m: PhantomData,
    }
}

pub fn scalar_mul<EA: Encoding, EB: Encoding>(
    a: &Scalar<EA>,
    b: &Scalar<EB>,
) -> Scalar<<(EA, EB) as ProductEncoding>::Output>
where
    (EA, EB): ProductEncoding,
{
    Scalar {
        limbs: scalar_mont_pro(&a.limbs, &b.limbs),
        m: PhantomData,
    }
}

pub fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
    Scalar {
        limbs: scalar_add_mod(&a.limbs, &b.limbs),
        m: PhantomData,
    }
}

pub fn scalar_sub(a: &Scalar, b: &Scalar) -> Scalar {
    Scalar {
        limbs: scalar_sub_mod(&a.limbs, &b.limbs),
        m: PhantomData,
    }
}

fn scalar_g(g_scalar: &Scalar) -> Point {
    base_point_mul(&g_scalar.limbs)
}

fn scalar_p(p_scalar: &Scalar, pk: &PublicKey) -> Point {
    let point = pk.to_point();
    point_mul(&point, &p_scalar.limbs)
}

/// [g_scalar]G + [p_scalar]Q. The two halves are public values during
/// verification, so the combining addition may branch on the degenerate
/// cases.
pub fn twin_mul(g_scalar: &Scalar, p_scalar: &Scalar, pk: &PublicKey) -> Point {
    let g_point = scalar_g(g_scalar);
    let p_point = scalar_p(p_scalar, pk);
    point_add_full(&g_point, &p_point)
}
