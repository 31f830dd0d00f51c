//! Value objects - immutable types that represent domain concepts

mod color;
mod emoji;
mod snowflake;

pub use color::{Color, ColorParseError, ColorSpec, GradientSpec};
pub use emoji::Emoji;
pub use snowflake::{Snowflake, SnowflakeParseError};
