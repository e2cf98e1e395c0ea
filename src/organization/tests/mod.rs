//! Unit tests for the organisation directory.
