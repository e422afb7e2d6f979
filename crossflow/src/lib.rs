//! CrossFlow: cycle-accurate latency-insensitive interconnect across clock domains.
//!
//! The kernel provides bit-representable values ([`Signal`]), channel interfaces ([`VrChannel`],
//! [`UniChannel`]), clocked modules ([`Module`], [`Fsm`]) and their composition ([`Chain`],
//! [`Cascade`]), two-clock components ([`ClockCrossing`]) with a metastability model ([`Launch`],
//! [`Resolver`]), and the testbench toolkit in [`sim`].

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::private_doc_tests)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::bare_urls)]
// #![deny(single_use_lifetimes)]
// #![deny(unused_lifetimes)]
//
#![allow(clippy::needless_lifetimes)]
#![allow(elided_lifetimes_in_paths)]
#![allow(type_alias_bounds)]

pub mod clock;
pub mod config;
pub mod crossing;
pub mod interface;
pub mod launch;
pub mod module;
pub mod module_composite;
pub mod module_fsm;
pub mod signal;
pub mod sim;
pub mod utils;

pub use clock::*;
pub use config::*;
pub use crossflow_macro::Signal;
pub use crossing::*;
pub use interface::*;
pub use launch::*;
pub use module::*;
pub use module_composite::*;
pub use module_fsm::*;
pub use signal::*;
pub use utils::*;
