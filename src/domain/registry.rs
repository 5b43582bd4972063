//! Country registry: ISO code -> CDS site identifier.

/// EU-27 plus the United Kingdom, in collection order.
///
/// The second element is the country slug used by the CDS history pages.
const EU_UK: [(&str, &str); 28] = [
    ("AT", "austria"),
    ("BE", "belgium"),
    ("BG", "bulgaria"),
    ("HR", "croatia"),
    ("CY", "cyprus"),
    ("CZ", "czech-republic"),
    ("DK", "denmark"),
    ("EE", "estonia"),
    ("FI", "finland"),
    ("FR", "france"),
    ("DE", "germany"),
    ("GR", "greece"),
    ("HU", "hungary"),
    ("IE", "ireland"),
    ("IT", "italy"),
    ("LV", "latvia"),
    ("LT", "lithuania"),
    ("LU", "luxembourg"),
    ("MT", "malta"),
    ("NL", "netherlands"),
    ("PL", "poland"),
    ("PT", "portugal"),
    ("RO", "romania"),
    ("SK", "slovakia"),
    ("SI", "slovenia"),
    ("ES", "spain"),
    ("SE", "sweden"),
    ("UK", "united-kingdom"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// Two-letter code, the primary key of both panels.
    pub code: String,
    /// Site identifier (slug) for the CDS history page.
    pub identifier: String,
}

impl Country {
    pub fn new(code: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            identifier: identifier.into(),
        }
    }
}

/// Ordered set of countries to collect. Iteration follows insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountryRegistry {
    entries: Vec<Country>,
}

impl CountryRegistry {
    /// The default EU-27 + UK registry.
    pub fn eu_uk() -> Self {
        EU_UK
            .iter()
            .map(|(code, slug)| Country::new(*code, *slug))
            .collect()
    }

    /// Append a country. A code that is already registered is ignored so
    /// every country appears exactly once in the panels.
    pub fn insert(&mut self, country: Country) {
        if self.get(&country.code).is_none() {
            self.entries.push(country);
        }
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.entries.iter().find(|c| c.code == code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Country> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Country> for CountryRegistry {
    fn from_iter<T: IntoIterator<Item = Country>>(iter: T) -> Self {
        let mut registry = CountryRegistry::default();
        for country in iter {
            registry.insert(country);
        }
        registry
    }
}

impl<'a> IntoIterator for &'a CountryRegistry {
    type Item = &'a Country;
    type IntoIter = std::slice::Iter<'a, Country>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
