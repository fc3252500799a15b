pub mod catalog;
pub mod common;
pub mod participation;
pub mod user;
