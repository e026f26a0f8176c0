pub mod auth;
pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod repository;
pub mod service;
pub mod web;

use sqlx::migrate::Migrator;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
