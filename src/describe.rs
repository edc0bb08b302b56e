//! Human-readable text for entries: ratings, dates, genres, publishers,
//! purchase and language notes shown in the entry detail panel.

use crate::model::{Book, City, Entry, Format, Genre, LocationType, Publisher, Purchase};
use chrono::Datelike;
use fxhash::FxHashMap;
use std::sync::OnceLock;

const FULL_STAR: char = '\u{2605}';
const EMPTY_STAR: char = '\u{2606}';

/// Five-character star string, e.g. `★★★☆☆` for 3.
pub fn star_rating(rating: u8) -> String {
    (0..5u8)
        .map(|i| if i < rating { FULL_STAR } else { EMPTY_STAR })
        .collect()
}

/// Capitalize the first letter of every space separated word.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `SCI_FI` -> `Sci Fi`, `historical fiction` -> `Historical Fiction`.
pub fn format_genre(raw: &str) -> String {
    capitalize_words(&raw.to_lowercase().replace('_', " "))
}

/// Lowercase form used inside sentences: `SCI_FI` -> `sci fi`.
fn format_subgenre(raw: &str) -> String {
    raw.to_lowercase().replace('_', " ")
}

pub fn author_list(book: &Book) -> String {
    book.authors
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Mar 4, 2021`, or the raw string when it does not parse.
pub fn date_text(entry: &Entry) -> String {
    match entry.date_read() {
        Ok(d) => format!("{} {}, {}", month_abbr(d.month()), d.day(), d.year()),
        Err(e) => {
            log::warn!("entry {}: {}", entry.id, e);
            entry.stopped_reading_date.clone()
        }
    }
}

fn month_abbr(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

static STATE_ABBREVS: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();

fn state_abbrevs() -> &'static FxHashMap<&'static str, &'static str> {
    STATE_ABBREVS.get_or_init(|| {
        [
            ("Alabama", "AL"),
            ("Alaska", "AK"),
            ("Arizona", "AZ"),
            ("Arkansas", "AR"),
            ("California", "CA"),
            ("Colorado", "CO"),
            ("Connecticut", "CT"),
            ("Delaware", "DE"),
            ("D.C.", "DC"),
            ("DC", "DC"),
            ("District of Columbia", "DC"),
            ("Florida", "FL"),
            ("Georgia", "GA"),
            ("Hawaii", "HI"),
            ("Idaho", "ID"),
            ("Illinois", "IL"),
            ("Indiana", "IN"),
            ("Iowa", "IA"),
            ("Kansas", "KS"),
            ("Kentucky", "KY"),
            ("Louisiana", "LA"),
            ("Maine", "ME"),
            ("Maryland", "MD"),
            ("Massachusetts", "MA"),
            ("Michigan", "MI"),
            ("Minnesota", "MN"),
            ("Mississippi", "MS"),
            ("Missouri", "MO"),
            ("Montana", "MT"),
            ("Nebraska", "NE"),
            ("Nevada", "NV"),
            ("New Hampshire", "NH"),
            ("New Jersey", "NJ"),
            ("New Mexico", "NM"),
            ("New York", "NY"),
            ("North Carolina", "NC"),
            ("North Dakota", "ND"),
            ("Ohio", "OH"),
            ("Oklahoma", "OK"),
            ("Oregon", "OR"),
            ("Pennsylvania", "PA"),
            ("Puerto Rico", "PR"),
            ("Rhode Island", "RI"),
            ("South Carolina", "SC"),
            ("South Dakota", "SD"),
            ("Tennessee", "TN"),
            ("Texas", "TX"),
            ("Utah", "UT"),
            ("Vermont", "VT"),
            ("Virgin Islands", "VI"),
            ("Virginia", "VA"),
            ("Washington", "WA"),
            ("West Virginia", "WV"),
            ("Wisconsin", "WI"),
            ("Wyoming", "WY"),
        ]
        .into_iter()
        .collect()
    })
}

/// Postal abbreviation for a US state or territory name.
pub fn state_abbrev(state: &str) -> Option<&'static str> {
    state_abbrevs().get(state).copied()
}

/// `Columbus, OH` for US cities, `Paris, France` elsewhere. An unknown US
/// region shows as `??` instead of disappearing.
pub fn city_text(city: &City) -> String {
    if city.country == "United States" {
        if city.region.is_empty() {
            return city.city.clone();
        }
        let abbrev = state_abbrev(&city.region).unwrap_or_else(|| {
            log::debug!("no state abbreviation for {:?}", city.region);
            "??"
        });
        format!("{}, {}", city.city, abbrev)
    } else {
        format!("{}, {}", city.city, city.country)
    }
}

fn independence(publisher: &Publisher) -> &'static str {
    if publisher.is_independent {
        "independent"
    } else {
        "not independent"
    }
}

pub fn publisher_text(publisher: &Publisher, published_year: i32) -> String {
    let city = city_text(&publisher.city);
    if publisher.is_imprint() {
        format!(
            "Published by {} ({}), an imprint of {}, which is {}. Originally appeared in {}.",
            publisher.name,
            city,
            publisher.parent_name,
            independence(publisher),
            published_year
        )
    } else {
        format!(
            "Published by {} ({}), which is {}. Originally appeared in {}.",
            publisher.name,
            city,
            independence(publisher),
            published_year
        )
    }
}

pub fn language_text(book: &Book) -> String {
    match &book.translator {
        Some(translator) => format!(
            "Read in {}, but written in {} and translated by {}.",
            book.language, book.original_language, translator.name
        ),
        None if book.is_translated() => format!(
            "Read in {}, but written in {}.",
            book.language, book.original_language
        ),
        None => format!("Written and read in {}.", book.language),
    }
}

pub fn purchase_text(purchase: &Purchase) -> String {
    match purchase.location_type {
        LocationType::Gift => "This book was a gift!".into(),
        LocationType::Bookstore => match purchase.bookstore() {
            Some(store) if store.is_library => format!(
                "Borrowed from {} in {}.",
                store.name,
                city_text(&store.city)
            ),
            Some(store) => format!(
                "Purchased from {} in {}.",
                store.name,
                city_text(&store.city)
            ),
            None => "Purchased at a bookstore.".into(),
        },
        LocationType::Website => match purchase.website() {
            Some(site) => format!("Purchased on {}.", site.website),
            None => "Purchased online.".into(),
        },
        LocationType::AffiliateWebsite => {
            let site = purchase
                .website()
                .map(|w| w.website.as_str())
                .unwrap_or("a website");
            match purchase.bookstore() {
                Some(store) => format!(
                    "Purchased on {}, which is affiliated with {} in {}.",
                    site,
                    store.name,
                    city_text(&store.city)
                ),
                None => format!("Purchased on {}.", site),
            }
        }
    }
}

pub fn genre_text(book: &Book) -> String {
    let subgenre = book.subgenre.as_str();
    match book.genre {
        Genre::Fiction => match subgenre {
            "OTHER" => "A work of fiction without a clear genre.".into(),
            _ => format!(
                "A work of fiction that could be considered {}.",
                format_subgenre(subgenre)
            ),
        },
        Genre::NonFiction => match subgenre {
            "OTHER" => "A non-fiction book.".into(),
            _ => format!("A non-fiction book: {}.", format_subgenre(subgenre)),
        },
        Genre::Poetry => "A book of poetry.".into(),
    }
}

pub fn format_text(book: &Book) -> Option<&'static str> {
    match (book.genre, book.format) {
        (Genre::Poetry, _) => None,
        (Genre::Fiction, Format::Long) => Some("The book is a novel."),
        (Genre::Fiction, Format::Medium) => Some("The book is a novella."),
        (Genre::NonFiction, Format::Long) => Some("The book is a single long work."),
        (Genre::NonFiction, Format::Medium) => {
            Some("The book is neither a long work nor a series of shorter works.")
        }
        (_, Format::MultipleShort) => Some("The book consists of multiple shorter pieces."),
    }
}
