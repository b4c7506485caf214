//! This module contains all the models used in the application.
pub mod account;
pub mod message;
pub mod session;
pub mod verification_code;
