use std::collections::HashMap;

const DEFAULT_GEO: &str = "DK";

const BUILTIN_GEOS: &[(&str, &str)] = &[
    ("DK", "DK"),
    ("SE", "SE"),
    ("NO", "NO"),
    ("FI", "FI"),
    ("DE", "DE"),
    ("NL", "NL"),
    ("UK", "GB"),
    ("GB", "GB"),
    ("US", "US"),
    ("GLOBAL", ""),
];

/// Country code to provider geography, with a fallback for unknown countries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoMapping {
    countries: HashMap<String, String>,
    default_geo: String,
}

impl Default for GeoMapping {
    fn default() -> Self {
        Self {
            countries: BUILTIN_GEOS
                .iter()
                .map(|(country, geo)| (country.to_string(), geo.to_string()))
                .collect(),
            default_geo: DEFAULT_GEO.to_string(),
        }
    }
}

impl GeoMapping {
    pub fn with_overrides(
        default_geo: Option<&str>,
        overrides: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut mapping = Self::default();
        if let Some(default_geo) = default_geo {
            mapping.default_geo = default_geo.to_string();
        }
        for (country, geo) in overrides {
            mapping.countries.insert(country.trim().to_uppercase(), geo);
        }
        mapping
    }

    pub fn resolve(&self, country: &str) -> &str {
        self.countries
            .get(&country.trim().to_uppercase())
            .unwrap_or(&self.default_geo)
    }

    pub fn default_geo(&self) -> &str {
        &self.default_geo
    }
}
