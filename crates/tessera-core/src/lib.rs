pub mod boundary;
pub mod config;
pub mod consts;
pub mod driver;
pub mod error;
pub mod filters;
pub mod kernel;
pub mod runtime;
pub mod sample;
pub mod window;
