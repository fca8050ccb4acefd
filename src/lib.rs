//! techtree - CRUD backend for a technology/skill graph
//!
//! Exposes REST endpoints over a small relational schema: a typed
//! `Node`/`Relation` graph plus a `Skill`/`Category` pair with
//! restricted partial updates. The Postgres schema is externally
//! owned; this service never issues DDL (see `sql/schema.sql` for the
//! reference definitions).
//!
//! Layering:
//! - `models` - entity and wire types plus field-level validation
//! - `database` - per-entity repositories over a `PgPool`
//! - `api` - axum routers; handlers validate, then call a repository

pub mod api;
pub mod database;
pub mod error;
pub mod models;

pub use error::ApiError;
