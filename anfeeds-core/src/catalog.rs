//! Anime catalog: entries, genres, and the genre/search filter.
//!
//! The catalog is read-only. It ships with a built-in list and can be replaced
//! by a TOML file of `[[entries]]` tables.

use serde::Deserialize;
use thiserror::Error;

use crate::types::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Action,
    Horror,
    Comedy,
    Fantasy,
    Romance,
}

impl Genre {
    /// Menu order.
    pub const ALL: [Genre; 5] = [
        Genre::Action,
        Genre::Horror,
        Genre::Comedy,
        Genre::Fantasy,
        Genre::Romance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Horror => "Horror",
            Genre::Comedy => "Comedy",
            Genre::Fantasy => "Fantasy",
            Genre::Romance => "Romance",
        }
    }
}

/// Which genres the catalog view shows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GenreFilter {
    #[default]
    All,
    Only(Genre),
}

impl GenreFilter {
    /// Filters in menu order: All, then each genre. Index 0..=5 maps to Alt+1..6.
    pub fn from_menu_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(GenreFilter::All),
            n => Genre::ALL.get(n - 1).copied().map(GenreFilter::Only),
        }
    }

    pub fn menu_index(self) -> usize {
        match self {
            GenreFilter::All => 0,
            GenreFilter::Only(g) => Genre::ALL.iter().position(|x| *x == g).map_or(0, |i| i + 1),
        }
    }

    pub fn matches(self, genre: Genre) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Only(g) => g == genre,
        }
    }

    /// Heading for the catalog view, e.g. "All Anime" or "Horror Anime".
    pub fn page_title(self) -> String {
        match self {
            GenreFilter::All => "All Anime".to_owned(),
            GenreFilter::Only(g) => format!("{} Anime", g.label()),
        }
    }

    /// Text for the transient genre indicator.
    pub fn indicator(self) -> String {
        match self {
            GenreFilter::All => "Showing: All Genres".to_owned(),
            GenreFilter::Only(g) => format!("Showing: {}", g.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub title: String,
    pub image: String,
    pub rating: String,
    pub year: u16,
    pub description: String,
    pub episodes: u32,
    pub genre: Genre,
}

/// One genre row in the catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub genre: Genre,
    pub entries: Vec<&'a CatalogEntry>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog has no entries")]
    Empty,
    #[error("duplicate catalog entry id {0}")]
    DuplicateId(EntryId),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parses a catalog file of the form `[[entries]] id = 1 title = "..." ...`.
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        if file.entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &file.entries {
            if !seen.insert(entry.id) {
                return Err(CatalogError::DuplicateId(entry.id));
            }
        }
        Ok(Self { entries: file.entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries to show, grouped by genre in menu order.
    ///
    /// A blank `query` applies `filter` and keeps every selected genre's row,
    /// even when empty. A non-blank query ignores `filter`, matches title or
    /// description case-insensitively, and drops rows without a match.
    pub fn sections(&self, filter: GenreFilter, query: &str) -> Vec<Section<'_>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Genre::ALL
                .iter()
                .filter(|g| filter.matches(**g))
                .map(|&genre| Section {
                    genre,
                    entries: self.entries.iter().filter(|e| e.genre == genre).collect(),
                })
                .collect();
        }

        Genre::ALL
            .iter()
            .map(|&genre| Section {
                genre,
                entries: self
                    .entries
                    .iter()
                    .filter(|e| e.genre == genre)
                    .filter(|e| {
                        e.title.to_lowercase().contains(&query)
                            || e.description.to_lowercase().contains(&query)
                    })
                    .collect(),
            })
            .filter(|s| !s.entries.is_empty())
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_toml_str(BUILTIN_CATALOG).unwrap_or_else(|_| Self { entries: Vec::new() })
    }
}

const BUILTIN_CATALOG: &str = r#"
[[entries]]
id = 1
title = "Attack on Titan"
image = "img/attack-on-titan.jpg"
rating = "9.0"
year = 2013
description = "Humanity fights for survival behind walls against giant man-eating Titans."
episodes = 87
genre = "action"

[[entries]]
id = 2
title = "Demon Slayer"
image = "img/demon-slayer.jpg"
rating = "8.7"
year = 2019
description = "A boy becomes a demon slayer to avenge his family and cure his sister."
episodes = 55
genre = "action"

[[entries]]
id = 3
title = "Jujutsu Kaisen"
image = "img/jujutsu-kaisen.jpg"
rating = "8.6"
year = 2020
description = "A student swallows a cursed finger and joins a school of sorcerers."
episodes = 47
genre = "action"

[[entries]]
id = 4
title = "Tokyo Ghoul"
image = "img/tokyo-ghoul.jpg"
rating = "7.8"
year = 2014
description = "A college student turns half-ghoul and must hide his hunger in Tokyo."
episodes = 48
genre = "horror"

[[entries]]
id = 5
title = "Another"
image = "img/another.jpg"
rating = "7.5"
year = 2012
description = "A transfer student uncovers the curse haunting his new class."
episodes = 12
genre = "horror"

[[entries]]
id = 6
title = "Parasyte"
image = "img/parasyte.jpg"
rating = "8.3"
year = 2014
description = "A parasite fails to take over a teenager's brain and settles in his hand."
episodes = 24
genre = "horror"

[[entries]]
id = 7
title = "Gintama"
image = "img/gintama.jpg"
rating = "9.0"
year = 2006
description = "An odd-jobs samurai scrapes by in an Edo occupied by aliens."
episodes = 367
genre = "comedy"

[[entries]]
id = 8
title = "One Punch Man"
image = "img/one-punch-man.jpg"
rating = "8.5"
year = 2015
description = "A hero who wins every fight with one punch searches for a worthy foe."
episodes = 24
genre = "comedy"

[[entries]]
id = 9
title = "KonoSuba"
image = "img/konosuba.jpg"
rating = "8.1"
year = 2016
description = "A shut-in is reborn in a fantasy world with a useless goddess in tow."
episodes = 20
genre = "comedy"

[[entries]]
id = 10
title = "Frieren"
image = "img/frieren.jpg"
rating = "9.3"
year = 2023
description = "An elf mage retraces a finished hero's journey to understand people."
episodes = 28
genre = "fantasy"

[[entries]]
id = 11
title = "Re:Zero"
image = "img/re-zero.jpg"
rating = "8.2"
year = 2016
description = "Transported to another world, a young man returns from death to fix fate."
episodes = 66
genre = "fantasy"

[[entries]]
id = 12
title = "Mushoku Tensei"
image = "img/mushoku-tensei.jpg"
rating = "8.4"
year = 2021
description = "A man reincarnates in a world of magic and vows to live without regret."
episodes = 48
genre = "fantasy"

[[entries]]
id = 13
title = "Your Lie in April"
image = "img/your-lie-in-april.jpg"
rating = "8.6"
year = 2014
description = "A piano prodigy who lost his hearing for music meets a free-spirited violinist."
episodes = 22
genre = "romance"

[[entries]]
id = 14
title = "Horimiya"
image = "img/horimiya.jpg"
rating = "8.2"
year = 2021
description = "Two classmates discover each other's hidden sides and fall for each other."
episodes = 26
genre = "romance"

[[entries]]
id = 15
title = "Kaguya-sama: Love is War"
image = "img/kaguya-sama.jpg"
rating = "8.9"
year = 2019
description = "Two student council geniuses scheme to make the other confess first."
episodes = 37
genre = "romance"
"#;
