/// Main configuration module.
///
/// Re-exports submodules for game pacing and server configuration.
pub mod game;
pub mod server;
