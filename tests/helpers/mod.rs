// ==========================================
// Integration test helpers
// ==========================================

#![allow(dead_code)]

pub mod fleet_builder;
