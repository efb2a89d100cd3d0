//! TradeDesk dashboard core: domain records, the evaluation rubric, the
//! monthly reset/stats client and a SQLite-backed data service.

pub mod config;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod monthly;
pub mod rng;
pub mod rubric;
pub mod seed;
pub mod service;
pub mod session;
pub mod status;
pub mod store;
pub mod types;
