//! AI tool listings: directory pages, submission form and JSON API.
//!
//! Listings are created `pending` when payment is configured and `active`
//! otherwise; only active listings are ever shown publicly.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Landing page with preview and category counts |
//! | GET | `/directory`, `/annuaire` | Directory, `?category=` filter |
//! | GET | `/tool/{slug}` | Tool detail page |
//! | GET/POST | `/add`, `/ajouter` | Submission form |
//! | GET | `/api/tools` | Active tools (JSON) |
//! | POST | `/api/tools` | Submit a tool (JSON) |
//! | GET | `/api/tools/{slug}` | One active tool (JSON) |
//! | GET | `/api/categories` | Categories with counts (JSON) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{CatalogService, SubmissionService, ToolStore};
