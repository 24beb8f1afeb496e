pub mod data_gen;
pub mod search;
