// ABOUTME: Library crate for fieldvisit exposing the forms, guided tour and TUI for testing and external use

#![allow(missing_docs)]

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod models;
pub mod tour;
