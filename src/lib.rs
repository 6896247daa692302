pub mod app;
pub mod cmd;
pub mod error;
pub mod mapper;
