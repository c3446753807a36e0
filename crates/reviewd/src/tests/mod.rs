//! Test suites for the review daemon.

mod support;
