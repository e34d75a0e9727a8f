// Crop types and per-crop irrigation thresholds
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CropType {
    Tomato,
    Olive,
    Strawberry,
    Wheat,
    Citrus,
}

/// Static irrigation limits for one crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropThresholds {
    pub min_moisture_pct: f64,
    pub max_temp_c: f64,
}

impl CropType {
    /// Parse a crop name as stored on farm records. Matching is
    /// case-insensitive; unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tomato" => Some(Self::Tomato),
            "olive" => Some(Self::Olive),
            "strawberry" => Some(Self::Strawberry),
            "wheat" => Some(Self::Wheat),
            "citrus" => Some(Self::Citrus),
            _ => None,
        }
    }

    pub fn thresholds(&self) -> CropThresholds {
        match self {
            Self::Tomato => CropThresholds { min_moisture_pct: 60.0, max_temp_c: 30.0 },
            Self::Olive => CropThresholds { min_moisture_pct: 30.0, max_temp_c: 40.0 },
            Self::Strawberry => CropThresholds { min_moisture_pct: 70.0, max_temp_c: 25.0 },
            Self::Wheat => CropThresholds { min_moisture_pct: 40.0, max_temp_c: 35.0 },
            Self::Citrus => CropThresholds { min_moisture_pct: 50.0, max_temp_c: 35.0 },
        }
    }
}

impl CropThresholds {
    /// Look up thresholds by crop name. Unknown crops use the Tomato entry.
    pub fn for_crop(name: &str) -> CropThresholds {
        CropType::parse(name)
            .unwrap_or(CropType::Tomato)
            .thresholds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(CropType::parse("Olive"), Some(CropType::Olive));
        assert_eq!(CropType::parse("olive"), Some(CropType::Olive));
        assert_eq!(CropType::parse(" WHEAT "), Some(CropType::Wheat));
        assert_eq!(CropType::parse("cactus"), None);
    }

    #[test]
    fn test_known_crop_thresholds() {
        let strawberry = CropThresholds::for_crop("Strawberry");
        assert_eq!(strawberry.min_moisture_pct, 70.0);
        assert_eq!(strawberry.max_temp_c, 25.0);

        let olive = CropThresholds::for_crop("Olive");
        assert_eq!(olive.min_moisture_pct, 30.0);
    }

    #[test]
    fn test_unknown_crop_falls_back_to_default() {
        let unknown = CropThresholds::for_crop("dragonfruit");
        assert_eq!(unknown, CropType::Tomato.thresholds());
    }
}
