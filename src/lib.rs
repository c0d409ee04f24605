pub mod backend;
pub mod config;
pub mod controller;
pub mod humanize;
pub mod job;
pub mod observability;
pub mod worker;
