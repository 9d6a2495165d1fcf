//! Voter-side verification of ballots cast on voteweb.fr election sites.
//!
//! A voter is given *control elements* when voting. With them, [`controller`]
//! can check that the ballot paper they hold decrypts to what they meant to
//! cast (integrity) and that their encrypted ballot is in the ballot box
//! unchanged (presence).

pub mod aead;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod log;
pub mod present;
pub mod render;

#[cfg(test)]
mod test_util;

pub use error::{Error, Result};
