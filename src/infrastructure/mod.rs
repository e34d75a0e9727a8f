// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_cooldown_store;
pub mod gemini_provider;
pub mod simulated_sensor;
