//! Tone adjustment configurations built on [`picman_curve`].
//!
//! Two adjustment models cover the classic tone tools:
//!
//! - [`CurvesConfig`]: one freely editable [`picman_curve::Curve`] per
//!   color channel.
//! - [`LevelsConfig`]: per-channel input/output ranges plus a gamma
//!   exponent, convertible to curves via [`LevelsConfig::to_curves`].
//!
//! Both serialize with serde and read/write their legacy text file
//! formats ([`read_curves_file`], [`read_levels_file`] and friends).

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod channel;
mod curves;
mod error;
mod levels;

pub use channel::{Channel, NUM_CHANNELS};
pub use curves::{
    read_curves_file, parse_curves_file, write_curves_file, write_curves_file_to, CurvesConfig,
};
pub use error::{ToneError, ToneResult};
pub use levels::{
    read_levels_file, parse_levels_file, write_levels_file, write_levels_file_to, LevelsConfig,
};
