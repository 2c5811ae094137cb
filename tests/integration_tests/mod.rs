// Aggregates the integration suites under integration_tests/*
pub mod _support;
mod mod_http;
mod mod_search;
