pub mod crawler;
pub mod display;
pub mod web;

pub use crawler::{DocumentSource, SourceFactory};
pub use display::BrowserEnvironment;
pub use web::{WebDriverFactory, WebDriverSource};

#[cfg(test)]
pub(crate) mod fake;
