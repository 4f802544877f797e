//! ISO-10303-21 record encoding.
//!
//! [`encode()`] turns one [`Value`](crate::model::Value) into its STEP literal,
//! [`render()`] assembles a full `#N = TYPE(...);` record line.

pub mod encode;
pub mod render;
pub mod string;

pub use encode::{
    encode, encode_boolean, encode_bytes, encode_enum, encode_integer, encode_real,
    EncodeOptions, StepEncoder, DERIVED_TOKEN, NULL_TOKEN,
};
pub use render::{render, render_as, render_record};
pub use string::{decode_string_literal, encode_string};
