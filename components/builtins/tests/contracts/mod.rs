//! Contract tests for builtins component
//!
//! These tests drive the installed globals from JavaScript, the way scripts
//! use them.
