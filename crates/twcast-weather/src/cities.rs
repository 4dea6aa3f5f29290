//! Fixed registry of Taiwanese cities and counties.
//!
//! Display names are the Chinese administrative names; slugs are the ASCII
//! identifiers the forecast API takes as a path parameter.

use std::collections::HashMap;

/// Slug used whenever no better city can be determined.
pub const DEFAULT_CITY_SLUG: &str = "kaohsiung";

/// Display name of [`DEFAULT_CITY_SLUG`].
pub const DEFAULT_CITY_NAME: &str = "高雄市";

const TAIWAN_CITIES: &[(&str, &str)] = &[
    ("高雄市", "kaohsiung"),
    ("宜蘭縣", "yilan"),
    ("花蓮縣", "hualien"),
    ("臺東縣", "taitung"),
    ("澎湖縣", "penghu"),
    ("金門縣", "kinmen"),
    ("連江縣", "lienchiang"),
    ("臺北市", "taipei"),
    ("新北市", "newtaipei"),
    ("桃園市", "taoyuan"),
    ("臺中市", "taichung"),
    ("臺南市", "tainan"),
    ("基隆市", "keelung"),
    ("新竹縣", "hsinchu-county"),
    ("新竹市", "hsinchu-city"),
    ("苗栗縣", "miaoli"),
    ("彰化縣", "changhua"),
    ("南投縣", "nantou"),
    ("雲林縣", "yunlin"),
    ("嘉義縣", "chiayi-county"),
    ("嘉義市", "chiayi-city"),
    ("屏東縣", "pingtung"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityEntry {
    pub display_name: String,
    pub slug: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Slug {slug} is used by both {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
    #[error("City {0} is listed more than once")]
    DuplicateName(String),
}

/// Bidirectional name/slug mapping, immutable once built.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    entries: Vec<CityEntry>,
    name_to_slug: HashMap<String, String>,
    slug_to_name: HashMap<String, String>,
}

impl CityRegistry {
    /// Build a registry, rejecting any repeated slug or display name.
    pub fn new<N, S>(entries: impl IntoIterator<Item = (N, S)>) -> Result<Self, RegistryError>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let mut registry = Self {
            entries: Vec::new(),
            name_to_slug: HashMap::new(),
            slug_to_name: HashMap::new(),
        };

        for (name, slug) in entries {
            let (name, slug) = (name.into(), slug.into());

            if registry.name_to_slug.contains_key(&name) {
                return Err(RegistryError::DuplicateName(name));
            }
            if let Some(first) = registry.slug_to_name.get(&slug) {
                return Err(RegistryError::DuplicateSlug {
                    slug,
                    first: first.clone(),
                    second: name,
                });
            }

            registry.name_to_slug.insert(name.clone(), slug.clone());
            registry.slug_to_name.insert(slug.clone(), name.clone());
            registry.entries.push(CityEntry {
                display_name: name,
                slug,
            });
        }

        Ok(registry)
    }

    /// The 22 cities and counties served by the forecast feed.
    pub fn taiwan() -> Result<Self, RegistryError> {
        Self::new(TAIWAN_CITIES.iter().copied())
    }

    pub fn slug_for(&self, display_name: &str) -> Option<&str> {
        self.name_to_slug.get(display_name).map(String::as_str)
    }

    pub fn name_for(&self, slug: &str) -> Option<&str> {
        self.slug_to_name.get(slug).map(String::as_str)
    }

    /// Resolve user input given either as a display name or a slug.
    pub fn lookup(&self, input: &str) -> Option<&CityEntry> {
        let input = input.trim();
        let slug = self
            .slug_for(input)
            .map(str::to_string)
            .unwrap_or_else(|| input.to_ascii_lowercase());
        self.entries.iter().find(|e| e.slug == slug)
    }

    /// Entries in table order, as shown by the city selector
    pub fn entries(&self) -> &[CityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
