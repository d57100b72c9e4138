//! Middleware modules for request processing.
//!
//! This module contains middleware and extractors for handling cross-cutting
//! concerns like authentication and role checking.
//!
//! # Modules
//!
//! - [`auth`]: The `AuthUser` extractor backing every protected route
//! - [`role`]: Role-gate middleware and role checking helpers
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor validates the JWT and loads the user from the
//!    database (soft-deleted accounts are treated as missing)
//! 3. Role gates check the loaded user's role where required
//! 4. Handler executes if all checks pass

pub mod auth;
pub mod role;
