//! Implementation of proc macros on signal types.
//!
//! # Note
//!
//! `#[derive(Signal)]` assumes the `Signal` trait is in scope at the use site (`use crossflow::*;`).
//!
//! A struct is laid out by concatenating its fields in declaration order, least significant bit
//! first. For example, the bit layout of the following beat is `payload[0..32] ++ lane_mask[0..4]`.
//!
//! ```ignore
//! #[derive(Debug, Clone, Default, PartialEq, Signal)]
//! pub struct Beat {
//!     payload: Bits<32>,
//!     lane_mask: Bits<4>,
//! }
//! ```
//!
//! A unit enum is encoded by its variant index, or by `#[encode(n)]` when given. Its width is
//! `clog2(#variants)` unless overridden by `#[width(n)]`.

mod signal;
mod utils;

use proc_macro::{self, TokenStream};

#[proc_macro_derive(Signal, attributes(width, encode))]
pub fn signal(input: TokenStream) -> TokenStream { signal::derive(input) }
