//! Integration tests - whole translation runs against the blogging catalog
//!
//! These tests drive the factory, navigation, resolution and promotion
//! together the way a query walker does.

mod common;

mod group_by_tests;
mod join_promotion_tests;
mod resolution_tests;
