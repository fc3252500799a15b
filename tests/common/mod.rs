#![allow(dead_code)]

pub mod catalog_helpers;
pub mod utils;
