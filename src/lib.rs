//! memesmith site code
//!
//! Generates memes from a topic and a humor style: an LLM writes the
//! caption, a hosted image service renders the reaction image, and the
//! compositor in [`meme`] stamps the text on in classic top/bottom form.

#![allow(clippy::multiple_crate_versions)]
#![deny(clippy::all)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::disallowed_methods)]
#![deny(clippy::expect_used)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::panic)]
#![deny(clippy::perf)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::unreachable)]
#![deny(clippy::unwrap_used)]
#![deny(warnings)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod meme;
pub mod web;
