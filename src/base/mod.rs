//! Foundation types for the reftrace toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ClassId`], [`MethodId`] - Handles to program model entities
//! - [`LineRange`] - Source line-range tags
//!
//! This module has NO dependencies on other reftrace modules.

mod ids;
mod lines;

pub use ids::{ClassId, MethodId};
pub use lines::LineRange;
