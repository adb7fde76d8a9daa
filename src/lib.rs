//! mail2site: turn one mail message from stdin into a stored page and a
//! regenerated static news digest.

pub mod domain;
pub mod mail;
pub mod site;
pub mod store;
