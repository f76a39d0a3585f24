//! Page layout and PDF output.
//!
//! [`TwoPassRenderer`] lays a block sequence out onto pages and resolves the
//! table of contents; [`write_pdf`] turns the final pass into PDF bytes.

pub mod font;
mod layout;
mod pdf;
mod style;
mod two_pass;

pub use font::Font;
pub use layout::{wrap_text, LaidOutPage, PageGeometry, PlacedLine};
pub use pdf::{write_pdf, PdfInfo};
pub use style::{Alignment, StyleSheet, TextStyle};
pub use two_pass::{provisional_index, PassOutput, Rendered, TwoPassRenderer};
