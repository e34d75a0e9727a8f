// Application layer - Use cases and ports
pub mod clock;
pub mod cooldown_store;
pub mod orchestrator;
pub mod recommendation_provider;
pub mod rule_engine;
pub mod sensor_source;
pub mod session;
