//! Statistical functions
//!
//! Primitives applied to the values of one group. They take borrowed values
//! so that a group can be reduced without copying its column slice.

pub mod descriptive;

pub use descriptive::{
    count, max, mean, min, mode, nunique, pstdev, pvariance, stdev, sum, variance,
};
