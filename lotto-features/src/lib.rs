pub mod config;
pub mod expand;
pub mod frequency;
pub mod gaps;
pub mod hot_cold;
pub mod pipeline;
pub mod row;
pub mod schema;
pub mod split;
pub mod temporal;
pub mod universe;

#[cfg(test)]
pub(crate) mod test_support;
