//! Unit tests - configuration and catalog loading without building any IR

mod config_loading_tests;
