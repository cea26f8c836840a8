pub mod launch;

pub use launch::handle_launch_command;
