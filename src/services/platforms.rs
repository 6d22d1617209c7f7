use crate::models::Platform;

/// Maps streaming platform names to catalog watch-provider ids
pub trait PlatformResolver: Send + Sync {
    /// Resolves each known platform to its provider id; unknown names are skipped
    fn provider_ids_for(&self, platforms: &[String], region: &str) -> Vec<u32>;

    /// All platforms the resolver knows
    fn platforms(&self) -> Vec<Platform>;

    /// Names accepted by `provider_ids_for`
    fn platform_ids(&self) -> Vec<String> {
        self.platforms().into_iter().map(|p| p.id).collect()
    }
}

/// (id, display name, TMDB watch-provider id)
const PLATFORM_TABLE: &[(&str, &str, u32)] = &[
    ("netflix", "Netflix", 8),
    ("amazon_prime", "Amazon Prime Video", 9),
    ("disney_plus", "Disney+", 2),
    ("hbo_max", "HBO Max", 118),
    ("hulu", "Hulu", 15),
    ("apple_tv", "Apple TV+", 350),
    ("paramount_plus", "Paramount+", 531),
    ("peacock", "Peacock", 386),
    ("crunchyroll", "Crunchyroll", 283),
];

/// Region-independent lookup over a fixed table of major platforms
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPlatformResolver;

impl StaticPlatformResolver {
    pub fn new() -> Self {
        Self
    }

    fn lookup(name: &str) -> Option<u32> {
        let name = name.trim();
        PLATFORM_TABLE
            .iter()
            .find(|(id, _, _)| id.eq_ignore_ascii_case(name))
            .map(|(_, _, provider_id)| *provider_id)
    }
}

impl PlatformResolver for StaticPlatformResolver {
    fn provider_ids_for(&self, platforms: &[String], region: &str) -> Vec<u32> {
        let mut provider_ids = Vec::with_capacity(platforms.len());
        for platform in platforms {
            match Self::lookup(platform) {
                Some(id) if !provider_ids.contains(&id) => provider_ids.push(id),
                Some(_) => {}
                None => tracing::warn!(
                    platform = %platform,
                    region = %region,
                    "Unknown streaming platform, skipping"
                ),
            }
        }
        provider_ids
    }

    fn platforms(&self) -> Vec<Platform> {
        PLATFORM_TABLE
            .iter()
            .map(|(id, name, provider_id)| Platform {
                id: id.to_string(),
                name: name.to_string(),
                provider_id: *provider_id,
            })
            .collect()
    }
}
