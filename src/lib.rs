//! Fitmap - map your activities!
//!
//! This crate serves activities recorded as FIT files over HTTP, and renders
//! a selected activity as a path on a map surface together with a short text
//! summary. The map engine itself is not part of the crate: it is abstracted
//! behind the capability interface in [`viewport`], which anything able to
//! draw a polyline and fit its view to a bounding region can implement.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod activity;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod select;
pub mod server;
pub mod viewport;
