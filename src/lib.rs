//! Scripts for deploying and initializing the vault & strategy smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod addressbook;
pub mod artifacts;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod predict;
mod solidity;
pub mod utils;
