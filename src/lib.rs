// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Smooth scalar animation driven by a second-order dynamics filter.
//!
//! A value follows a changing target with the feel of a damped spring,
//! described by a natural frequency and a damping ratio. The frame loop only
//! runs while the value has not converged.
//!
//! # Key entry points
//!
//! - [`animation::AnimationDriver`] - the frame loop: `animate`, `tick`,
//!   `destroy`
//! - [`animation::SecondOrderDynamics`] - the filter, usable on its own
//! - [`animation::FrameScheduler`] / [`animation::Clock`] - the host
//!   boundary
//! - [`options::AnimationOptions`] - tuning parameters with TOML presets
//!
//! Logging goes through the [`log`] facade; the crate never installs a
//! logger.

pub mod animation;
pub mod error;
pub mod options;

pub use error::AnimationError;
