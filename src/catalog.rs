//! Enemy archetype catalog
//!
//! Read-only templates for enemy kinds. The catalog is fetched once per
//! session, outside the tick loop; until it arrives the simulation sees an
//! empty catalog and simply spawns nothing.

use serde::{Deserialize, Serialize};

/// Built-in archetypes, used by the native harness and as fetch fallback data
pub const BUILTIN_ARCHETYPES_JSON: &str = include_str!("../assets/archetypes.json");

/// Immutable template describing one enemy kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    /// Type tag ("scout", "bomber", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Starting health
    pub health: u32,
    /// Base speed (scaled by `Tuning::enemy_speed_scale`)
    pub speed: f32,
    /// Visual hint, CSS color string
    pub color: String,
    /// Collision radius in world units
    pub size: f32,
    /// Score awarded on kill
    pub points: u64,
}

/// Source of enemy archetypes
pub trait ArchetypeCatalog {
    /// All known archetypes (may be empty)
    fn list_archetypes(&self) -> &[Archetype];

    /// Look up an archetype by type tag
    fn get_archetype(&self, kind: &str) -> Option<&Archetype> {
        self.list_archetypes().iter().find(|a| a.kind == kind)
    }
}

/// In-memory catalog loaded from a JSON array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    archetypes: Vec<Archetype>,
}

impl StaticCatalog {
    pub fn new(archetypes: Vec<Archetype>) -> Self {
        Self { archetypes }
    }

    /// Catalog with no archetypes (nothing spawns)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `[{type, health, speed, color, size, points}, ...]`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded default catalog
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_ARCHETYPES_JSON) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Built-in archetype catalog is malformed: {}", e);
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

impl ArchetypeCatalog for StaticCatalog {
    fn list_archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }
}

/// Load progress of the session's catalog
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// Fetch still in flight; behaves as an empty catalog
    #[default]
    Pending,
    /// Fetch finished (possibly with an empty catalog after a failure)
    Ready(StaticCatalog),
}

impl CatalogState {
    /// Settle from a load result; failures degrade to an empty catalog
    pub fn from_result<E: std::fmt::Display>(result: Result<StaticCatalog, E>) -> Self {
        match result {
            Ok(catalog) => {
                log::info!("Archetype catalog loaded ({} types)", catalog.len());
                CatalogState::Ready(catalog)
            }
            Err(e) => {
                log::error!("Failed to load archetype catalog: {}", e);
                CatalogState::Ready(StaticCatalog::empty())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CatalogState::Ready(_))
    }
}

impl ArchetypeCatalog for CatalogState {
    fn list_archetypes(&self) -> &[Archetype] {
        match self {
            CatalogState::Pending => &[],
            CatalogState::Ready(catalog) => catalog.list_archetypes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = StaticCatalog::builtin();
        assert!(!catalog.is_empty());
        let scout = catalog.get_archetype("scout").unwrap();
        assert_eq!(scout.points, 100);
        assert!(catalog.get_archetype("mothership").is_none());
    }

    #[test]
    fn test_empty_list_is_valid() {
        let catalog = StaticCatalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.list_archetypes().is_empty());
    }

    #[test]
    fn test_id_field_is_ignored() {
        let json = r##"[{"Id": 7, "type": "drone", "health": 3, "speed": 2.5,
                        "color": "#00FF00", "size": 1.0, "points": 50}]"##;
        let catalog = StaticCatalog::from_json(json).unwrap();
        assert_eq!(catalog.list_archetypes()[0].kind, "drone");
        assert_eq!(catalog.list_archetypes()[0].health, 3);
    }

    #[test]
    fn test_failed_load_degrades_to_empty() {
        let state = CatalogState::from_result(StaticCatalog::from_json("not json"));
        assert!(state.is_ready());
        assert!(state.list_archetypes().is_empty());
    }

    #[test]
    fn test_pending_behaves_as_empty() {
        let state = CatalogState::Pending;
        assert!(!state.is_ready());
        assert!(state.get_archetype("scout").is_none());
    }
}
