pub mod config;
pub mod convert;
pub mod id;
pub mod publish;
