//! Loading of the exported JSON files.

use crate::config::{
    Config, GENRE_COUNTS_FILE, LANGUAGE_COUNTS_FILE, PUBLISHER_CITIES_FILE, READING_LIST_FILE,
};
use crate::counts::{
    parse_genre_counts, parse_language_counts, publisher_counts, CountTable, GenreCounts,
    LanguageCounts, PublisherCityList,
};
use crate::error::{ReadingLogError, Result};
use crate::model::ReadingList;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::Path;

/// Everything the dashboard shows, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub reading_list: ReadingList,
    pub genre_counts: Option<CountTable>,
    pub language_counts: Option<CountTable>,
    pub publisher_cities: Option<Vec<(String, u64)>>,
}

impl Dataset {
    /// The reading list is required; the chart tables are optional.
    pub fn load(config: &Config) -> Result<Self> {
        let reading_list: ReadingList = load_json(&config.data_file(READING_LIST_FILE))?;
        log::info!(
            "loaded {} entries from {}",
            reading_list.entries.len(),
            config.data_dir.display()
        );

        let genre_counts = load_optional::<GenreCounts>(&config.data_file(GENRE_COUNTS_FILE))?
            .map(|d| parse_genre_counts(&d));
        let language_counts =
            load_optional::<LanguageCounts>(&config.data_file(LANGUAGE_COUNTS_FILE))?
                .map(|d| parse_language_counts(&d));
        let publisher_cities =
            load_optional::<PublisherCityList>(&config.data_file(PUBLISHER_CITIES_FILE))?
                .map(|d| publisher_counts(&d));

        Ok(Self {
            reading_list,
            genre_counts,
            language_counts,
            publisher_cities,
        })
    }
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path).map_err(|source| ReadingLogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ReadingLogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_json`], but a missing file is `Ok(None)`.
pub fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match load_json(path) {
        Ok(value) => Ok(Some(value)),
        Err(ReadingLogError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::info!("{} not found, skipping", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Fresh per-test directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "reading-log-test-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config_for(dir: &Path) -> Config {
        let dir = dir.to_string_lossy().into_owned();
        Config::from_lookup(|key| (key == "READING_LOG_DIR").then(|| dir.clone()))
    }

    const READING_LIST: &str = r#"{"entries": [{
        "id": 1,
        "book": {
            "title": "Ficciones",
            "authors": [{"name": "Jorge Luis Borges"}],
            "language": "English",
            "originalLanguage": "Spanish",
            "publisher": {
                "name": "Grove Press",
                "parentName": "Grove Atlantic",
                "city": {"city": "New York", "region": "New York", "country": "United States"},
                "isIndependent": true
            },
            "publishedYear": 1944,
            "genre": "FICTION",
            "subgenre": "OTHER",
            "format": "MULTIPLE_SHORT"
        },
        "purchase": {"locationType": "GIFT"},
        "rating": 5,
        "stoppedReadingDate": "2020/11/02",
        "isReadCompletely": true
    }]}"#;

    #[test]
    fn test_load_with_only_reading_list() {
        let dir = scratch_dir("only-list");
        fs::write(dir.join(READING_LIST_FILE), READING_LIST).unwrap();

        let data = Dataset::load(&config_for(&dir)).unwrap();
        assert_eq!(data.reading_list.entries.len(), 1);
        assert_eq!(data.reading_list.entries[0].book.title, "Ficciones");
        assert!(data.genre_counts.is_none());
        assert!(data.publisher_cities.is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_count_tables() {
        let dir = scratch_dir("tables");
        fs::write(dir.join(READING_LIST_FILE), READING_LIST).unwrap();
        fs::write(
            dir.join(GENRE_COUNTS_FILE),
            r#"{"genres": [{"genre": "FICTION", "subgenres": [{"subgenre": "SCI_FI", "count": 3}]}]}"#,
        )
        .unwrap();

        let data = Dataset::load(&config_for(&dir)).unwrap();
        let genres = data.genre_counts.unwrap();
        assert_eq!(genres[0].0, "Fiction");
        assert_eq!(genres[0].1, vec![("Sci Fi".to_string(), 3)]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_reading_list_is_io_error() {
        let dir = scratch_dir("missing");
        let err = Dataset::load(&config_for(&dir)).unwrap_err();
        assert!(matches!(err, ReadingLogError::Io { ref path, .. } if path.ends_with(READING_LIST_FILE)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_json_is_reported_with_path() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join(READING_LIST_FILE), "{\"entries\": [").unwrap();
        let err = Dataset::load(&config_for(&dir)).unwrap_err();
        assert!(matches!(err, ReadingLogError::Json { .. }));
        assert!(err.to_string().contains(READING_LIST_FILE));
        let _ = fs::remove_dir_all(&dir);
    }
}
