pub mod aggregate;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod query;
pub mod resolver;
pub mod services;
pub mod storage;
pub mod validation;
