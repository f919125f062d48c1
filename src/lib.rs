pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod listing;
pub mod models;
pub mod notify;
pub mod repository;
pub mod services;
pub mod state;
pub mod storage;
pub mod views;
pub mod wizard;
