// Farm domain model
use serde::Serialize;

/// Farm metadata consumed read-only by the decision engine.
#[derive(Debug, Clone, Serialize)]
pub struct Farm {
    pub id: String,
    pub name: String,
    /// GPS string "lat,lng" or a city name.
    pub location: String,
    pub crop: String,
}
