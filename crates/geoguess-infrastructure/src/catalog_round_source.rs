//! Offline round source backed by a bundled country catalog.

use async_trait::async_trait;
use geoguess_core::error::Result;
use geoguess_core::round::{Country, RoundPayload, RoundSource};
use rand::seq::SliceRandom;

const CATALOG: &[(&str, &str)] = &[
    ("Argentina", "AR"),
    ("Australia", "AU"),
    ("Austria", "AT"),
    ("Belgium", "BE"),
    ("Brazil", "BR"),
    ("Canada", "CA"),
    ("Chile", "CL"),
    ("Colombia", "CO"),
    ("Côte d'Ivoire", "CI"),
    ("Croatia", "HR"),
    ("Czechia", "CZ"),
    ("Denmark", "DK"),
    ("Estonia", "EE"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("Germany", "DE"),
    ("Ghana", "GH"),
    ("Greece", "GR"),
    ("Iceland", "IS"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Ireland", "IE"),
    ("Italy", "IT"),
    ("Japan", "JP"),
    ("Kenya", "KE"),
    ("México", "MX"),
    ("Netherlands", "NL"),
    ("New Zealand", "NZ"),
    ("Norway", "NO"),
    ("Perú", "PE"),
    ("Poland", "PL"),
    ("Portugal", "PT"),
    ("Romania", "RO"),
    ("São Tomé and Príncipe", "ST"),
    ("Senegal", "SN"),
    ("South Africa", "ZA"),
    ("South Korea", "KR"),
    ("Spain", "ES"),
    ("Sweden", "SE"),
    ("Thailand", "TH"),
    ("Türkiye", "TR"),
    ("United Kingdom", "GB"),
    ("United States", "US"),
    ("Uruguay", "UY"),
];

/// Serves random catalog countries, skipping excluded codes while any remain.
#[derive(Debug, Clone, Default)]
pub struct CatalogRoundSource {
    image_base_url: Option<String>,
}

impl CatalogRoundSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `<base>/<code>.jpg` image URLs to served rounds (panorama screen).
    pub fn with_image_base_url(mut self, base: impl Into<String>) -> Self {
        self.image_base_url = Some(base.into());
        self
    }

    fn pick(exclude: &[String]) -> Option<(&'static str, &'static str)> {
        let candidates: Vec<_> = CATALOG
            .iter()
            .filter(|(_, code)| !exclude.iter().any(|e| e.eq_ignore_ascii_case(code)))
            .collect();

        let mut rng = rand::thread_rng();
        match candidates.choose(&mut rng) {
            Some(entry) => Some(**entry),
            None => CATALOG.choose(&mut rng).copied(),
        }
    }
}

#[async_trait]
impl RoundSource for CatalogRoundSource {
    async fn fetch_round(&self, exclude: &[String]) -> Result<Option<RoundPayload>> {
        let Some((name, code)) = Self::pick(exclude) else {
            return Ok(None);
        };

        let mut round = RoundPayload::new(uuid::Uuid::new_v4().to_string(), Country::new(name, code));
        if let Some(base) = &self.image_base_url {
            round = round.with_image_url(format!(
                "{}/{}.jpg",
                base.trim_end_matches('/'),
                code.to_ascii_lowercase()
            ));
        }
        Ok(Some(round))
    }
}
