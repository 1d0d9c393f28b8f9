//! License text handling.
//!
//! - [`heuristic`]: [`LicenseMatcher`](heuristic::LicenseMatcher) and its
//!   regex implementation for LICENSE files and manifests.
//! - [`archiver`]: URL shape check and persistence of `.licence` files.

pub mod archiver;
pub mod heuristic;
