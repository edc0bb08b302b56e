//! Pre-aggregated count tables and their roll-ups for the partition charts.

use crate::classify::GroupNode;
use crate::describe::format_genre;
use crate::error::{ReadingLogError, Result};
use crate::model::Genre;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Two-level count table: top key -> (child label, count), in display order.
pub type CountTable = Vec<(String, Vec<(String, u64)>)>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenreCounts {
    pub genres: Vec<GenreCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub subgenres: Vec<SubgenreCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgenreCount {
    pub subgenre: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageCounts {
    pub languages: Vec<LanguageCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCount {
    pub language: String,
    pub original_languages: Vec<OriginalLanguageCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalLanguageCount {
    pub original_language: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublisherCityList {
    pub cities: Vec<PublisherCity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherCity {
    pub name: String,
    pub state: String,
    pub publishers: Vec<PublisherTitles>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherTitles {
    pub name: String,
    pub titles: Vec<String>,
}

/// Larger count first; equal counts order by label, descending.
fn compare_counts(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0))
}

/// Roll a two-level table up to one total per top key.
///
/// Sorted by total, largest first, ties broken by label in descending order.
/// The classification tree breaks its ties the other way round; both rules
/// are kept as they are.
pub fn aggregate(table: &[(String, Vec<(String, u64)>)]) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = table
        .iter()
        .map(|(key, children)| (key.clone(), children.iter().map(|(_, c)| c).sum()))
        .collect();
    totals.sort_by(compare_counts);
    totals
}

/// Children of `key`, or `MissingKey` when the table has no such group.
pub fn children<'t>(
    table: &'t [(String, Vec<(String, u64)>)],
    key: &str,
) -> Result<&'t [(String, u64)]> {
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_slice())
        .ok_or_else(|| ReadingLogError::MissingKey(key.to_string()))
}

pub fn parse_genre_counts(data: &GenreCounts) -> CountTable {
    data.genres
        .iter()
        .map(|g| {
            let mut subgenres: Vec<(String, u64)> = g
                .subgenres
                .iter()
                .map(|sg| (format_genre(&sg.subgenre), sg.count))
                .collect();
            subgenres.sort_by(compare_counts);
            let genre = Genre::from_raw(&g.genre)
                .map(|genre| genre.label().to_string())
                .unwrap_or_else(|| format_genre(&g.genre));
            (genre, subgenres)
        })
        .collect()
}

/// Keyed by the language read in, children are the original languages.
pub fn parse_language_counts(data: &LanguageCounts) -> CountTable {
    data.languages
        .iter()
        .map(|l| {
            let mut originals: Vec<(String, u64)> = l
                .original_languages
                .iter()
                .map(|o| (o.original_language.clone(), o.count))
                .collect();
            originals.sort_by(compare_counts);
            (l.language.clone(), originals)
        })
        .collect()
}

/// Titles per publisher city, most first.
pub fn publisher_counts(data: &PublisherCityList) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = data
        .cities
        .iter()
        .map(|c| {
            let titles = c.publishers.iter().map(|p| p.titles.len() as u64).sum();
            let label = if c.state.is_empty() {
                c.name.clone()
            } else {
                format!("{}, {}", c.name, c.state)
            };
            (label, titles)
        })
        .collect();
    counts.sort_by(compare_counts);
    counts
}

/// Count occurrences of each label, most frequent first.
pub fn tally<I>(labels: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: FxHashMap<String, u64> = FxHashMap::default();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, u64)> = counts.into_iter().collect();
    counts.sort_by(compare_counts);
    counts
}

/// Count table of a classification tree's first two levels. A terminal list
/// directly under the root becomes a single child carrying its own label.
/// Empty groups are left out.
pub fn count_table(tree: &GroupNode<'_>) -> CountTable {
    let GroupNode::Branch(groups) = tree else {
        return Vec::new();
    };

    groups
        .iter()
        .filter(|(_, node)| !node.is_empty())
        .map(|(key, node)| {
            let counts = match node {
                GroupNode::Leaf(entries) => vec![(key.clone(), entries.len() as u64)],
                GroupNode::Branch(children) => children
                    .iter()
                    .filter(|(_, c)| !c.is_empty())
                    .map(|(k, c)| (k.clone(), c.len() as u64))
                    .collect(),
            };
            (key.clone(), counts)
        })
        .collect()
}
