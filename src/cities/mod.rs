use crate::models::CityName;
use std::collections::HashSet;

/// Cities and London boroughs the search service knows how to scrape
pub const UK_CITIES: &[&str] = &[
    "London", "Birmingham", "Manchester", "Glasgow", "Liverpool", "Newcastle", "Sheffield",
    "Bristol", "Leeds", "Cardiff", "Nottingham", "Coventry", "Bradford", "Belfast",
    "Stoke-on-Trent", "Wolverhampton", "Sunderland", "Portsmouth", "Leicester", "Aberdeen",
    "Brighton", "Plymouth", "Derby", "Swindon", "Luton", "Middlesbrough", "Blackpool",
    "Stockport", "Bolton", "York", "Cambridge", "Swansea", "Dundee", "Derry", "Bournemouth",
    "Exeter", "Southampton", "Inverness", "Gloucester", "Wakefield", "Falkirk", "Chester",
    "St Albans", "Slough", "Lincoln", "Hastings", "Telford", "Salisbury", "Dunfermline",
    "Camden", "Islington", "Southwark", "Bromley", "Tower Hamlets", "Hackney", "Brent",
    "Ealing", "Lambeth", "Wandsworth", "Hammersmith and Fulham", "Croydon", "Newham",
    "Redbridge", "Hounslow", "Bexley", "Barnet", "Havering", "Greenwich", "Enfield",
    "Haringey", "Durham", "Milton Keynes", "Salford", "Aberystwyth", "Peterborough",
    "Lichfield", "Maidstone", "Basingstoke", "Woking", "Rugby", "Dudley", "Kirkcaldy",
    "Wokingham", "Camberley", "Colchester", "Dartford", "Wellingborough", "Kent",
];

/// Immutable, deduplicated set of selectable city names
#[derive(Debug, Clone)]
pub struct CityCatalog {
    names: Vec<CityName>,
    // Lowercased names, index-aligned with `names`
    folded: Vec<String>,
}

impl CityCatalog {
    /// Build a catalog, keeping the first spelling of case-insensitive duplicates
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut catalog = Self {
            names: Vec::new(),
            folded: Vec::new(),
        };

        for name in names {
            let name: String = name.into();
            let key = name.to_lowercase();
            if seen.insert(key.clone()) {
                catalog.names.push(name);
                catalog.folded.push(key);
            }
        }

        catalog
    }

    pub fn names(&self) -> &[CityName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Candidate cities containing `input` (case-insensitive), in catalog order
    pub fn match_input(&self, input: &str) -> Vec<CityName> {
        if input.is_empty() {
            return Vec::new();
        }

        let needle = input.to_lowercase();
        self.names
            .iter()
            .zip(&self.folded)
            .filter(|(_, folded)| folded.contains(&needle))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Canonical spelling of `input` if it names a catalog entry exactly (ignoring case)
    pub fn resolve(&self, input: &str) -> Option<&CityName> {
        let key = input.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.folded
            .iter()
            .position(|folded| *folded == key)
            .map(|idx| &self.names[idx])
    }
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::new(UK_CITIES.iter().copied())
    }
}
