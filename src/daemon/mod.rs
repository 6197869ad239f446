//! Daemon process management for the background vmnet supervisor
//!
//! This module handles detaching the supervisor, including pid file
//! ownership and log redirection.

pub mod process;
