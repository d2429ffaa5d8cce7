//! Long-running request work that is more than a repository call.

pub mod broadcast;
