//! Utility modules for the MentorHub API.
//!
//! This module contains shared utilities used throughout the application:
//!
//! - [`email`]: Email sending utilities using SMTP
//! - [`errors`]: Application error types and handling
//! - [`jwt`]: JWT token creation and verification
//! - [`pagination`]: Request pagination utilities
//! - [`password`]: Password hashing and verification

pub mod email;
pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod password;
