//! Entry builders for unit tests.

use crate::model::{
    Author, Book, Bookstore, City, Entry, Format, Genre, LocationType, Publisher, Purchase,
    PurchaseLocation, Website,
};

pub fn city(city: &str, region: &str, country: &str) -> City {
    City {
        city: city.into(),
        region: region.into(),
        country: country.into(),
    }
}

/// A completed, independently published English fiction entry bought as a gift.
pub fn entry(id: u64, date: &str) -> Entry {
    Entry {
        id,
        book: Book {
            title: format!("Book {}", id),
            authors: vec![Author {
                name: format!("Author {}", id),
                birth_year: Some(1950),
                gender: None,
            }],
            language: "English".into(),
            original_language: "English".into(),
            translator: None,
            publisher: Publisher {
                name: "Graywolf".into(),
                parent_name: "Graywolf".into(),
                city: city("Minneapolis", "Minnesota", "United States"),
                is_independent: true,
            },
            published_year: 2000,
            genre: Genre::Fiction,
            subgenre: "OTHER".into(),
            format: Format::Long,
        },
        purchase: Purchase {
            location_type: LocationType::Gift,
            location: None,
        },
        rating: 3,
        stopped_reading_date: date.into(),
        is_read_completely: true,
    }
}

pub fn with_rating(mut e: Entry, rating: u8) -> Entry {
    e.rating = rating;
    e
}

pub fn with_languages(mut e: Entry, language: &str, original: &str) -> Entry {
    e.book.language = language.into();
    e.book.original_language = original.into();
    e
}

pub fn with_publisher(mut e: Entry, name: &str, parent: &str, independent: bool) -> Entry {
    e.book.publisher.name = name.into();
    e.book.publisher.parent_name = parent.into();
    e.book.publisher.is_independent = independent;
    e
}

pub fn with_genre(mut e: Entry, genre: Genre, subgenre: &str) -> Entry {
    e.book.genre = genre;
    e.book.subgenre = subgenre.into();
    e
}

pub fn with_published_year(mut e: Entry, year: i32) -> Entry {
    e.book.published_year = year;
    e
}

pub fn bookstore(name: &str, is_library: bool) -> Bookstore {
    Bookstore {
        name: name.into(),
        city: city("Columbus", "Ohio", "United States"),
        is_library,
    }
}

pub fn with_purchase(mut e: Entry, location_type: LocationType) -> Entry {
    e.purchase = Purchase {
        location_type,
        location: match location_type {
            LocationType::Gift => None,
            LocationType::Bookstore => Some(PurchaseLocation::Bookstore(bookstore(
                "Prologue Bookshop",
                false,
            ))),
            LocationType::Website => Some(PurchaseLocation::Website(Website {
                website: "bookshop.org".into(),
                bookstore: None,
            })),
            LocationType::AffiliateWebsite => Some(PurchaseLocation::Website(Website {
                website: "bookshop.org".into(),
                bookstore: Some(bookstore("Prologue Bookshop", false)),
            })),
        },
    };
    e
}

pub fn with_library(mut e: Entry) -> Entry {
    e.purchase = Purchase {
        location_type: LocationType::Bookstore,
        location: Some(PurchaseLocation::Bookstore(bookstore(
            "Columbus Metropolitan Library",
            true,
        ))),
    };
    e
}

/// A varied collection touching every bucket of every policy.
pub fn sample() -> Vec<Entry> {
    vec![
        with_rating(entry(1, "2021-03-04"), 5),
        with_languages(with_rating(entry(2, "2020-12-30"), 4), "English", "French"),
        with_publisher(
            with_purchase(entry(3, "2021-07-19"), LocationType::Website),
            "Knopf",
            "Penguin Random House",
            false,
        ),
        with_genre(with_library(entry(4, "2019-01-02")), Genre::Poetry, "OTHER"),
        with_genre(
            with_purchase(entry(5, "2021/05/11"), LocationType::Bookstore),
            Genre::NonFiction,
            "HISTORY",
        ),
        with_published_year(
            with_languages(
                with_purchase(entry(6, "2020-02-14"), LocationType::AffiliateWebsite),
                "English",
                "German",
            ),
            1967,
        ),
        with_rating(with_genre(entry(7, "2021-03-04"), Genre::Fiction, "SCI_FI"), 0),
        with_publisher(entry(8, "2018-10-10"), "Vintage", "Penguin Random House", false),
    ]
}
