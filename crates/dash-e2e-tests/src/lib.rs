//! End-to-end tests for the dashboard widget engine.
//!
//! These tests exercise the crates together:
//! - Widget config registration and field value builds
//! - Data table pipelines, lifecycle and cycle rejection
//! - Publishing widgets against their data tables
//! - The shared dashboard context

#![cfg(test)]
