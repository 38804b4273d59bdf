//! Data models for the visitor desk

pub mod user;
pub mod visitor;
