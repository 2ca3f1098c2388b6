// Public API for clients, the relay binary and integration tests

pub mod catalog;
pub mod channel;
pub mod config;
pub mod display;
pub mod error;
pub mod leaderboard;
pub mod protocol;
pub mod state;
pub mod transport;
pub mod types;

// Relay server
pub mod api;
pub mod relay;
pub mod ws;

// Background tasks of the channel adapter
pub mod broadcast;
