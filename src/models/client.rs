use crate::utils::text::capitalize;

/// Root collection holding one sub-collection of events per client.
pub const ROOT_COLLECTION: &str = "novedades";
/// Name of the per-client event sub-collection.
pub const EVENTS_GROUP: &str = "eventos";

/// How a client's event documents name their fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    /// Path segment under `novedades/`, e.g. "tgs".
    pub key: String,
    /// Display name, e.g. "TGS".
    pub name: String,
    pub event_key: String,
    /// `None` for buildings, whose location is built from edificio/unidad.
    pub location_key: Option<String>,
}

const KNOWN: [(&str, &str, &str, Option<&str>); 5] = [
    ("tgs", "TGS", "evento-tgs", Some("locaciones-tgs")),
    ("edificios", "Edificios", "evento-edificio", None),
    ("vtv", "VTV", "evento-vtv", Some("planta-vtv")),
    ("barrios", "Barrios", "evento-barrios", Some("barrio")),
    ("otros", "Otros", "evento-otros", Some("otro")),
];

impl ClientProfile {
    /// The five client collections the dashboard listens to.
    pub fn all() -> Vec<ClientProfile> {
        KNOWN
            .iter()
            .map(|(key, name, ev, loc)| ClientProfile {
                key: key.to_string(),
                name: name.to_string(),
                event_key: ev.to_string(),
                location_key: loc.map(str::to_string),
            })
            .collect()
    }

    /// Profile for a client key; unknown keys get a generic profile.
    pub fn for_key(key: &str) -> ClientProfile {
        let lower = key.to_lowercase();
        Self::all()
            .into_iter()
            .find(|p| p.key == lower)
            .unwrap_or_else(|| ClientProfile {
                name: capitalize(&lower),
                event_key: format!("evento-{lower}"),
                location_key: Some("ubicacion".to_string()),
                key: lower,
            })
    }

    /// Profile for a document path `novedades/{key}/eventos/{id}`.
    pub fn for_path(path: &str) -> Option<ClientProfile> {
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            [ROOT_COLLECTION, key, EVENTS_GROUP, _id] if !key.is_empty() => {
                Some(Self::for_key(key))
            }
            _ => None,
        }
    }

    /// `novedades/{key}/eventos`
    pub fn collection_path(&self) -> String {
        format!("{ROOT_COLLECTION}/{}/{EVENTS_GROUP}", self.key)
    }

    pub fn is_buildings(&self) -> bool {
        self.key == "edificios"
    }
}
