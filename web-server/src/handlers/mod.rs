//! HTTP handlers

pub mod admin;
pub mod analyses;
pub mod auth;
pub mod health;
