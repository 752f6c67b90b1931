//! Coordinate conversion form: the linear approximation, the transient form
//! state it runs against, and the delay that precedes every result.

pub mod approx;
pub mod form;
pub mod schedule;

pub use approx::{GeographicPoint, UtmPoint, METERS_PER_DEGREE};
pub use form::{
    ConversionForm, ConversionResult, Direction, Field, GeoInput, PendingConversion, Phase,
    UtmInput, UtmZone,
};
pub use schedule::{run_conversion, FixedDelay, Immediate, Scheduler};
