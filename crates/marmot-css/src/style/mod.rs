//! Style representation and computation.
//!
//! Styles move through three stages:
//!
//! 1. Declarations from matched rules accumulate into a [`SpecifiedStyle`]
//!    (every field optional, later declarations overwrite earlier ones).
//! 2. [`SpecifiedStyle::resolve`] turns the accumulated values into a
//!    [`ComputedStyle`] with no holes, resolving units against a
//!    [`values::ResolveContext`].
//! 3. Layout consumes the `ComputedStyle`, resolving any deferred
//!    percentages and `calc()` parts against real container sizes.

pub mod computed;
pub mod specified;
pub mod values;

pub use computed::ComputedStyle;
pub use specified::SpecifiedStyle;
