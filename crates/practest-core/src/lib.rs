//! practest-core — Exam model, session controller, and scoring.
//!
//! This crate defines the exam data model, the answer key, the per-section
//! scoring policies and the session state machine that the rest of practest
//! builds on, plus the grammar reference that accompanies the exams.

pub mod answers;
pub mod catalog;
pub mod config;
pub mod error;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod policy;
pub mod scorer;
pub mod session;
