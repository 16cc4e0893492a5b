//! Fashion Decoder: product catalog filtering, an AI fashion assistant chat,
//! and DripSeek scene scanning, served over HTTP.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod dripseek;
pub mod error;
pub mod gateway;
pub mod image;
pub mod llm;
pub mod notify;
pub mod server;
pub mod video;
