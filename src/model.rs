//! Reading-log records as exported by the data pipeline.
//!
//! Everything here is read-only after load. The classification core only
//! ever borrows entries; it never clones or mutates them.

use crate::error::{ReadingLogError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(alias = "readingListId")]
    pub id: u64,
    pub book: Book,
    pub purchase: Purchase,
    pub rating: u8,
    pub stopped_reading_date: String,
    pub is_read_completely: bool,
}

impl Entry {
    /// Calendar date the entry was finished (or abandoned).
    pub fn date_read(&self) -> Result<NaiveDate> {
        parse_date(&self.stopped_reading_date)
    }
}

/// Parse an ISO-like calendar date. Both `2021-03-04` and `2021/03/04` are
/// accepted; anything else is an error rather than a fallback date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let normalized = value.trim().replace('/', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").map_err(|source| {
        ReadingLogError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub authors: Vec<Author>,
    pub language: String,
    pub original_language: String,
    #[serde(default)]
    pub translator: Option<Author>,
    pub publisher: Publisher,
    pub published_year: i32,
    pub genre: Genre,
    pub subgenre: String,
    pub format: Format,
}

impl Book {
    #[inline]
    pub fn is_translated(&self) -> bool {
        self.language != self.original_language
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub city: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub name: String,
    /// Equal to `name` unless the publisher is an imprint.
    pub parent_name: String,
    pub city: City,
    pub is_independent: bool,
}

impl Publisher {
    #[inline]
    pub fn is_imprint(&self) -> bool {
        self.name != self.parent_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Fiction,
    NonFiction,
    Poetry,
}

impl Genre {
    /// Parse the exported spelling (`NON_FICTION`, `non-fiction`, ...).
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "FICTION" => Some(Genre::Fiction),
            "NON_FICTION" => Some(Genre::NonFiction),
            "POETRY" => Some(Genre::Poetry),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Poetry => "Poetry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Format {
    Long,
    Medium,
    MultipleShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Gift,
    Bookstore,
    Website,
    #[serde(alias = "ONLINE_BOOKSTORE")]
    AffiliateWebsite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookstore {
    pub name: String,
    pub city: City,
    #[serde(default)]
    pub is_library: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub website: String,
    /// Set when the website is run by a physical bookstore.
    #[serde(default)]
    pub bookstore: Option<Bookstore>,
}

/// Shape depends on [`LocationType`]: gifts carry nothing, bookstores a
/// [`Bookstore`], websites a [`Website`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PurchaseLocation {
    Website(Website),
    Bookstore(Bookstore),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub location_type: LocationType,
    #[serde(default)]
    pub location: Option<PurchaseLocation>,
}

impl Purchase {
    pub fn bookstore(&self) -> Option<&Bookstore> {
        match self.location.as_ref()? {
            PurchaseLocation::Bookstore(b) => Some(b),
            PurchaseLocation::Website(w) => w.bookstore.as_ref(),
        }
    }

    pub fn website(&self) -> Option<&Website> {
        match self.location.as_ref()? {
            PurchaseLocation::Website(w) => Some(w),
            PurchaseLocation::Bookstore(_) => None,
        }
    }

    #[inline]
    pub fn is_library(&self) -> bool {
        self.location_type == LocationType::Bookstore
            && self.bookstore().is_some_and(|b| b.is_library)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingList {
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_both_separators() {
        let a = parse_date("2021-03-04").unwrap();
        let b = parse_date("2021/03/04").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, NaiveDate::from_ymd_opt(2021, 3, 4).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("March 4th").unwrap_err();
        assert!(matches!(err, ReadingLogError::InvalidDate { ref value, .. } if value == "March 4th"));
    }

    #[test]
    fn test_deserialize_exported_entry() {
        let json = r#"{
            "readingListId": 7,
            "book": {
                "title": "The Emigrants",
                "authors": [{"name": "W. G. Sebald", "birthYear": 1944, "gender": "MALE"}],
                "language": "English",
                "originalLanguage": "German",
                "translator": {"name": "Michael Hulse", "birthYear": null, "gender": "MALE"},
                "publisher": {
                    "name": "New Directions",
                    "parentName": "New Directions",
                    "city": {"city": "New York", "region": "New York", "country": "United States"},
                    "isIndependent": true
                },
                "publishedYear": 1992,
                "genre": "NON_FICTION",
                "subgenre": "HISTORY",
                "format": "MULTIPLE_SHORT"
            },
            "purchase": {
                "locationType": "ONLINE_BOOKSTORE",
                "location": {
                    "website": "bookshop.org",
                    "bookstore": {
                        "name": "Book Culture",
                        "city": {"city": "New York", "region": "New York", "country": "United States"},
                        "isLibrary": false
                    }
                }
            },
            "rating": 5,
            "stoppedReadingDate": "2021-03-04",
            "isReadCompletely": true
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.book.genre, Genre::NonFiction);
        assert_eq!(entry.book.format, Format::MultipleShort);
        assert!(entry.book.is_translated());
        assert_eq!(entry.purchase.location_type, LocationType::AffiliateWebsite);
        assert_eq!(entry.purchase.website().unwrap().website, "bookshop.org");
        assert_eq!(entry.purchase.bookstore().unwrap().name, "Book Culture");
        assert!(!entry.purchase.is_library());
    }

    #[test]
    fn test_genre_from_raw() {
        assert_eq!(Genre::from_raw("NON_FICTION"), Some(Genre::NonFiction));
        assert_eq!(Genre::from_raw("non-fiction"), Some(Genre::NonFiction));
        assert_eq!(Genre::from_raw("Poetry"), Some(Genre::Poetry));
        assert_eq!(Genre::from_raw("drama"), None);
    }

    #[test]
    fn test_library_purchase() {
        let json = r#"{
            "locationType": "BOOKSTORE",
            "location": {
                "name": "Columbus Metropolitan Library",
                "city": {"city": "Columbus", "region": "Ohio", "country": "United States"},
                "isLibrary": true
            }
        }"#;
        let purchase: Purchase = serde_json::from_str(json).unwrap();
        assert!(purchase.is_library());
        assert!(purchase.website().is_none());
    }

    #[test]
    fn test_gift_has_no_location() {
        let purchase: Purchase =
            serde_json::from_str(r#"{"locationType": "GIFT", "location": null}"#).unwrap();
        assert_eq!(purchase.location_type, LocationType::Gift);
        assert!(purchase.bookstore().is_none());
    }
}
