// ABOUTME: Library crate for ws-repl exposing the console widget and its collaborators

pub mod app;
pub mod components;
pub mod config;
pub mod repl;
pub mod terminal;
pub mod transcript;
pub mod web;
