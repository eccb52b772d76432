//! Authentication module for accounts and sessions.
//!
//! This module provides registration, login, refresh-token rotation and
//! logout, plus the bearer-token middleware that guards every other route.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
