//! Vocabulary shared between the page controller and its hosts.

pub mod domain;
pub mod error;
pub mod protocol;
