//! Shared value types for Next to Go.
//!
//! Kept free of runtime dependencies so both the core crate and any renderer
//! can depend on it.

pub mod formatting;

mod category;

pub use category::{
    Category, GREYHOUND_CATEGORY_ID, HARNESS_CATEGORY_ID, HORSE_CATEGORY_ID, default_categories,
};
