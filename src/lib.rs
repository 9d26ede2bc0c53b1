// src/lib.rs

//! Vacancy Crawler Library
//!
//! Collects job listings from an hh.ru-style search API, keeps recent and
//! relevant ones, and derives salary statistics from dated snapshots.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
