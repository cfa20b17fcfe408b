//! Signal Strata - Multi-Source Signal Reconciliation & Stratified Detection
//!
//! This crate decides which heterogeneous workspace sources (chat, meeting
//! transcripts, tracker history) contribute to one analysis event, fuses
//! their confidence signals into a cross-source confidence score, and
//! classifies detected anti-patterns into three confidence strata.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
