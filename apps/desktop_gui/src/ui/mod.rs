//! UI layer for the calculator window.

pub mod app;

pub use app::CalculatorApp;
