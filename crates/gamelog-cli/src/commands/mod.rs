pub mod clear;
pub mod config;
pub mod games;
pub mod platform;
pub mod sort;
pub mod status;
pub mod transfer;
