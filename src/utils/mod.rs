//! Utility functions

mod normalize;

pub use normalize::{Normalizer, basename, extension};
