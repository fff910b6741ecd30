//! Infrastructure shared by record evaluation and discovery.

pub mod dns;
pub mod domain;
