//! Authentication for the educator management and billing API

pub mod educator_auth;

pub use educator_auth::EducatorIdentity;
