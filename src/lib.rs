pub mod rankcore;
pub mod server;
