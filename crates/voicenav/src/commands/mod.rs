pub mod completion;
pub mod config;
pub mod locations;
pub mod navigate;
pub mod route;
