//! Variation operators: crossover, mutation and the varOr offspring driver.

pub mod crossover;
pub mod mutation;
pub mod variation;

pub use variation::{Variation, var_or};
