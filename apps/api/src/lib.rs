//! Resume ↔ job-description matching service.
//!
//! The scoring core (`matching`) depends only on the collaborator traits in
//! `inference`, `llm_client` and `extraction`; the HTTP host in `routes`
//! wires concrete clients into it at startup.

pub mod config;
pub mod errors;
pub mod extraction;
pub mod inference;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod retrieval;
pub mod routes;
pub mod state;
pub mod text;

#[cfg(test)]
mod testing;
