//! User registration and authentication service.
//!
//! Exposes `Register`, `Login` and `GetUser` as JSON RPCs over HTTP. Passwords
//! are stored as Argon2id hashes and successful logins receive an HS256 bearer
//! token.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod state;
