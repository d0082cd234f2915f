//! Integration tests that drive fnbuild against a scripted fake compiler.

#![cfg(unix)]

mod build_tests;
mod common;
