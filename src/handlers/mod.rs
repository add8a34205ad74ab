// handlers/mod.rs - HTTP handlers grouped by security level
//
// public/    - no token required (welcome, health, login, registration)
// protected/ - bearer token required (movies, user accounts, favorites)

pub mod protected;
pub mod public;
