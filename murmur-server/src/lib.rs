#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unreachable_pub)]

//! murmur-server

pub mod app_state;
pub mod crypto;
pub mod db;
pub mod docs;
pub mod error;
pub mod extract;
pub mod inbox;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod session;
pub mod settings;
pub mod setups;
pub mod suggestion;
pub mod verification;

#[cfg(test)]
#[allow(unreachable_pub)]
mod test_utils;
