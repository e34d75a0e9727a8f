// Domain layer - Core irrigation models
pub mod crop;
pub mod decision;
pub mod farm;
pub mod sensor;
