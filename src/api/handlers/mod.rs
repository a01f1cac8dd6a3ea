//! API handlers

pub mod auth;
pub mod campaigns;
pub mod health;
pub mod operator;
pub mod reservations;
pub mod stations;
pub mod users;
