pub mod app;
pub mod config;
pub mod dataset;
pub mod deck;
pub mod enhance;
pub mod error;
pub mod logging;
pub mod palette;
pub mod parser;
pub mod source;
pub mod ui;

pub use dataset::{Dataset, Record};
pub use deck::Selection;
pub use error::{Error, Result};
pub use parser::parse;
