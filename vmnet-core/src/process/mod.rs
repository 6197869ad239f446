//! Process probing, termination and socket cleanup
//!
//! Tracked processes are identified by their pid files only; nothing here
//! keeps handles to child processes.

pub mod pid_file;
pub mod sockets;
pub mod terminate;

pub use pid_file::{is_alive, is_process_running, read_pid};
pub use sockets::reclaim_stale;
pub use terminate::{terminate_all, SignalTerminator, StopReport, Terminator};
