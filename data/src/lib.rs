//! Monster dataset and name resolution.
//!
//! The dataset is a fixed, hand-maintained list embedded in the binary. The
//! [`Resolver`] maps noisy OCR or typed text onto it with fuzzy matching.

mod dataset;
pub use dataset::*;
mod error;
pub use error::*;
mod matcher;
pub use matcher::*;
mod record;
pub use record::*;
mod resolver;
pub use resolver::*;
mod text;
pub use text::{clean, clean_with};
