//! Typed async client for the taskdeck REST API.
//!
//! Wraps the auth, project, and task resources behind [`ApiClient`]. One
//! HTTP call per function; a bearer token, when set, rides along on every
//! request. Errors carry the transport failure or the server's status and
//! message — retries and caching are the caller's business, not ours.

pub mod client;
pub mod error;
pub mod models;

pub use client::{ApiClient, ProjectQuery};
pub use error::ApiError;
pub use models::{
    AuthResponse, NewProject, NewTask, Project, ProjectPage, ProjectPatch, ProjectStatus, Task,
    TaskPatch, TaskStatus, User,
};
