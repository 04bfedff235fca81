/// Monitored river site registry.
///
/// Defines the canonical list of river monitoring sites this service scores,
/// along with their coordinates and land-use classification. This is the
/// single source of truth for site ids — other modules should reference
/// sites from here rather than hardcoding ids.
///
/// The engine only reads these entries. Creating, editing, or retiring a
/// site happens in the administration layer, which owns the persistent site
/// records this registry mirrors.

use crate::model::LandUse;

/// Metadata for a single monitored river site.
pub struct RiverSite {
    /// Stable site id, shared with the persistent site record.
    pub id: u32,
    /// Display name of the river and reach.
    pub name: &'static str,
    /// Malaysian state, for grouping in dashboards.
    pub state: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Land-use classification of the surrounding terrain. Drives the
    /// debris baseline and composition profile.
    pub land_use: LandUse,
}

/// All monitored river sites, ordered west coast to east coast.
///
/// Land-use classifications follow the original site survey; coordinates
/// are the mid-reach monitoring points.
pub static SITE_REGISTRY: &[RiverSite] = &[
    RiverSite {
        id: 1,
        name: "Sungai Klang at Kuala Lumpur",
        state: "Kuala Lumpur",
        latitude: 3.1390,
        longitude: 101.6869,
        land_use: LandUse::Urban,
    },
    RiverSite {
        id: 2,
        name: "Sungai Gombak at Setapak",
        state: "Kuala Lumpur",
        latitude: 3.2050,
        longitude: 101.7048,
        land_use: LandUse::Urban,
    },
    RiverSite {
        id: 3,
        name: "Sungai Juru at Seberang Perai",
        state: "Penang",
        latitude: 5.3242,
        longitude: 100.4269,
        land_use: LandUse::Industrial,
    },
    RiverSite {
        id: 4,
        name: "Sungai Pinang at George Town",
        state: "Penang",
        latitude: 5.4040,
        longitude: 100.3288,
        land_use: LandUse::Mixed,
    },
    RiverSite {
        id: 5,
        name: "Sungai Tebrau at Johor Bahru",
        state: "Johor",
        latitude: 1.5120,
        longitude: 103.7790,
        land_use: LandUse::Industrial,
    },
    RiverSite {
        id: 6,
        name: "Sungai Kelantan at Kota Bharu",
        state: "Kelantan",
        latitude: 6.1254,
        longitude: 102.2387,
        land_use: LandUse::Rural,
    },
    RiverSite {
        id: 7,
        name: "Sungai Terengganu at Kuala Terengganu",
        state: "Terengganu",
        latitude: 5.3302,
        longitude: 103.1408,
        land_use: LandUse::Coastal,
    },
];

/// Looks up a site by id. Returns `None` if not found.
pub fn find_site(id: u32) -> Option<&'static RiverSite> {
    SITE_REGISTRY.iter().find(|s| s.id == id)
}

/// Returns the ids of all monitored sites.
pub fn all_site_ids() -> Vec<u32> {
    SITE_REGISTRY.iter().map(|s| s.id).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
