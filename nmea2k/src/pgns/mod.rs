pub mod pgn129039;

// Re-export commonly used types
pub use pgn129039::AisClassBPosition;
