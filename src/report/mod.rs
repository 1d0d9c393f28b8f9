//! Report renderers for resolved licenses.
//!
//! - [`terminal`]: grid table on stdout.
//! - [`html`]: standalone `license.html` page with the same columns.

pub mod html;
pub mod terminal;
