//! Honor records: domain types, mapping, persistence and use cases.

pub mod domain;
pub mod mapper;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::HonorService;
