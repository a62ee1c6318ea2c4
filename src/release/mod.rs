//! Release resolution layer
//!
//! Maps a raw version specifier (empty, "latest", an exact version, or a
//! semver range) to a single concrete release record from the paginated
//! HashiCorp releases API.
//!
//! # Modules
//!
//! - [`catalog`]: catalog trait and HTTP implementation over the releases API
//! - [`resolver`]: specifier parsing and resolution strategy selection
//! - [`error`]: error types for catalog and resolution operations
//! - [`types`]: wire types (`ProductRelease`, `Build`)

pub mod catalog;
pub mod error;
pub mod resolver;
pub mod types;
