// ABOUTME: Library crate for gatewise exposing the onboarding wizard engine for the CLI and tests

#![allow(missing_docs)]

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod routing;
pub mod store;
pub mod wizard;
