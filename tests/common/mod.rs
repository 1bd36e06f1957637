#![allow(dead_code)]

pub mod doubles;
pub mod utils;
