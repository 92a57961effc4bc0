//! Implementation modules for `keeper`.
//!
//! `src/keeper.rs` remains the stable facade.

pub(crate) mod admin;
pub(crate) mod engine;
pub(crate) mod genesis;
