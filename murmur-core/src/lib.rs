#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unreachable_pub)]

//! murmur-core

pub mod common;
pub mod message;
pub mod suggestion;
pub mod username;
