//! Inspection of the published archive itself, used when the POM declares no license.

pub mod jar;
