//! Shared model and pure logic of the Amanote course-page augmentation.
//!
//! Both the browser client and the server link against this crate: the server
//! produces the parameter models, the client reads them back, looks files up
//! and builds the outbound links.

pub mod file_index;
pub mod modal;
pub mod model;
pub mod requests;
pub mod url_builder;

#[cfg(test)]
mod fixtures;
