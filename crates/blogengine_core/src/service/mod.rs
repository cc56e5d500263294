//! Core use-case services.
//!
//! # Responsibility
//! - Turn repository `Option` reads into not-found errors.
//! - Read records back after writes so callers see stored state.
//! - Keep the admin and web layers decoupled from storage details.

pub mod content_service;
pub mod query_service;
