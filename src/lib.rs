//! In-memory university catalog: filtering, review aggregation, review
//! submission, rankings and comparison over fixture data.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fixtures;
pub mod import;
pub mod models;
pub mod rankings;
pub mod report;
pub mod reviews;
pub mod store;
pub mod submission;
