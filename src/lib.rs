// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod export;
pub mod generator;
pub mod loader;
pub mod parser;
pub mod progress;
