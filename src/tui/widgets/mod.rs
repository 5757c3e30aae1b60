pub mod questions;
pub mod quiz;
