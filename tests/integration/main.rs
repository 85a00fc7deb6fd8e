//! Integration tests for the lending core

mod lending_tests;
