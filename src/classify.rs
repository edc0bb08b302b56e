//! Grouping of reading-log entries into ordered category trees.
//!
//! Each [`Policy`] buckets entries by one or two derived keys and orders the
//! buckets its own way. Terminal lists are always most recently read first.

use crate::describe::{format_genre, star_rating};
use crate::error::{ReadingLogError, Result};
use crate::model::{Entry, Genre, LocationType};
use chrono::{Datelike, NaiveDate};
use fxhash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

pub const INDEPENDENT_PRESS: &str = "Independent Press";
pub const MAINSTREAM_PRESS: &str = "Mainstream Press";
pub const ORIGINAL_LANGUAGE: &str = "Read in Original Language";
pub const TRANSLATION: &str = "Read in Translation";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Policy {
    #[default]
    DateRead,
    Publisher,
    DatePublished,
    Language,
    Genre,
    PurchaseInfo,
    Rating,
}

impl Policy {
    /// Display order of the sort buttons.
    pub const ALL: [Policy; 7] = [
        Policy::DateRead,
        Policy::Publisher,
        Policy::DatePublished,
        Policy::Language,
        Policy::Genre,
        Policy::PurchaseInfo,
        Policy::Rating,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Policy::DateRead => "date read",
            Policy::Publisher => "publisher",
            Policy::DatePublished => "date published",
            Policy::Language => "language",
            Policy::Genre => "genre",
            Policy::PurchaseInfo => "purchase info",
            Policy::Rating => "rating",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&p| p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = ReadingLogError;

    fn from_str(s: &str) -> Result<Self> {
        Policy::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ReadingLogError::InvalidPolicy(s.to_string()))
    }
}

/// Result of classification: an ordered map of groups, or a terminal list.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupNode<'a> {
    Leaf(Vec<&'a Entry>),
    Branch(Vec<(String, GroupNode<'a>)>),
}

impl<'a> GroupNode<'a> {
    /// Number of entries below this node.
    pub fn len(&self) -> usize {
        match self {
            GroupNode::Leaf(entries) => entries.len(),
            GroupNode::Branch(children) => children.iter().map(|(_, c)| c.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<&GroupNode<'a>> {
        match self {
            GroupNode::Leaf(_) => None,
            GroupNode::Branch(children) => children.iter().find(|(k, _)| k == key).map(|(_, c)| c),
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            GroupNode::Leaf(_) => Vec::new(),
            GroupNode::Branch(children) => children.iter().map(|(k, _)| k.as_str()).collect(),
        }
    }

    /// Terminal entries in tree order.
    pub fn flatten(&self) -> Vec<&'a Entry> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<&'a Entry>) {
        match self {
            GroupNode::Leaf(entries) => out.extend(entries.iter().copied()),
            GroupNode::Branch(children) => {
                for (_, child) in children {
                    child.collect_into(out);
                }
            }
        }
    }
}

/// Classify `entries` under `policy`.
pub fn classify(entries: &[Entry], policy: Policy) -> Result<GroupNode<'_>> {
    let tree = match policy {
        Policy::DateRead => by_date_read(entries.iter())?,
        Policy::Publisher => by_publisher(entries)?,
        Policy::DatePublished => by_date_published(entries)?,
        Policy::Language => by_language(entries)?,
        Policy::Genre => by_genre(entries)?,
        Policy::PurchaseInfo => by_purchase_info(entries)?,
        Policy::Rating => by_rating(entries)?,
    };
    log::debug!(
        "classified {} entries by {} into {} groups",
        entries.len(),
        policy,
        tree.keys().len()
    );
    Ok(tree)
}

/// Insertion-ordered buckets; a group is created the first time its key shows up.
struct Buckets<K, V> {
    index: FxHashMap<K, usize>,
    groups: Vec<(K, V)>,
}

impl<K: Eq + Hash + Clone, V: Default> Buckets<K, V> {
    fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.groups.len();
                self.index.insert(key.clone(), i);
                self.groups.push((key, V::default()));
                i
            }
        };
        &mut self.groups[i].1
    }

    fn into_groups(self) -> Vec<(K, V)> {
        self.groups
    }
}

impl<K: Eq + Hash + Clone, V: Default> Default for Buckets<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Most recently read first. The sort is stable, so entries read on the same
/// day keep their input order.
fn sorted_by_date_desc<'a>(entries: Vec<&'a Entry>) -> Result<Vec<&'a Entry>> {
    let mut keyed = entries
        .into_iter()
        .map(|e| Ok((e.date_read()?, e)))
        .collect::<Result<Vec<(NaiveDate, &Entry)>>>()?;
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(keyed.into_iter().map(|(_, e)| e).collect())
}

fn leaf(entries: Vec<&Entry>) -> Result<GroupNode<'_>> {
    Ok(GroupNode::Leaf(sorted_by_date_desc(entries)?))
}

/// Largest group first; equal sizes fall back to the label, ascending.
fn sort_by_size_desc(groups: &mut [(String, GroupNode<'_>)]) {
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
}

/// Turn label -> entries buckets into leaves ordered by size.
fn sized_leaves<'a>(
    buckets: Buckets<String, Vec<&'a Entry>>,
) -> Result<Vec<(String, GroupNode<'a>)>> {
    let mut groups = buckets
        .into_groups()
        .into_iter()
        .map(|(k, v)| Ok((k, leaf(v)?)))
        .collect::<Result<Vec<_>>>()?;
    sort_by_size_desc(&mut groups);
    Ok(groups)
}

/// Bucket by a year and order the years newest first.
fn by_year<'a>(keyed: Vec<(i32, &'a Entry)>) -> Result<GroupNode<'a>> {
    let mut buckets: Buckets<i32, Vec<&Entry>> = Buckets::new();
    for (year, e) in keyed {
        buckets.entry(year).push(e);
    }

    let mut years = buckets.into_groups();
    years.sort_by(|a, b| b.0.cmp(&a.0));

    let children = years
        .into_iter()
        .map(|(year, v)| Ok((year.to_string(), leaf(v)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(GroupNode::Branch(children))
}

fn by_date_read<'a>(entries: impl Iterator<Item = &'a Entry>) -> Result<GroupNode<'a>> {
    let keyed = entries
        .map(|e| Ok((e.date_read()?.year(), e)))
        .collect::<Result<Vec<_>>>()?;
    by_year(keyed)
}

fn by_date_published(entries: &[Entry]) -> Result<GroupNode<'_>> {
    by_year(entries.iter().map(|e| (e.book.published_year, e)).collect())
}

fn by_publisher(entries: &[Entry]) -> Result<GroupNode<'_>> {
    let mut presses: Buckets<&'static str, Buckets<String, Vec<&Entry>>> = Buckets::new();

    for e in entries {
        let publisher = &e.book.publisher;
        let (press, name) = if publisher.is_independent {
            (INDEPENDENT_PRESS, &publisher.name)
        } else {
            (MAINSTREAM_PRESS, &publisher.parent_name)
        };
        presses.entry(press).entry(name.clone()).push(e);
    }

    let mut presses = presses.into_groups();
    presses.sort_by(|a, b| a.0.cmp(b.0));

    let children = presses
        .into_iter()
        .map(|(press, names)| Ok((press.to_string(), GroupNode::Branch(sized_leaves(names)?))))
        .collect::<Result<Vec<_>>>()?;
    Ok(GroupNode::Branch(children))
}

fn by_language(entries: &[Entry]) -> Result<GroupNode<'_>> {
    let mut original: Buckets<String, Vec<&Entry>> = Buckets::new();
    let mut translated: Buckets<String, Buckets<String, Vec<&Entry>>> = Buckets::new();

    for e in entries {
        let book = &e.book;
        if book.is_translated() {
            translated
                .entry(format!("Read in {}", book.language))
                .entry(format!("Translated from {}", book.original_language))
                .push(e);
        } else {
            original.entry(book.language.clone()).push(e);
        }
    }

    let mut translations = translated
        .into_groups()
        .into_iter()
        .map(|(to, froms)| Ok((to, GroupNode::Branch(sized_leaves(froms)?))))
        .collect::<Result<Vec<_>>>()?;
    sort_by_size_desc(&mut translations);

    Ok(GroupNode::Branch(vec![
        (
            ORIGINAL_LANGUAGE.to_string(),
            GroupNode::Branch(sized_leaves(original)?),
        ),
        (TRANSLATION.to_string(), GroupNode::Branch(translations)),
    ]))
}

fn by_genre(entries: &[Entry]) -> Result<GroupNode<'_>> {
    let mut fiction: Buckets<String, Vec<&Entry>> = Buckets::new();
    let mut non_fiction: Buckets<String, Vec<&Entry>> = Buckets::new();
    let mut poetry: Vec<&Entry> = Vec::new();

    for e in entries {
        match e.book.genre {
            Genre::Fiction => fiction.entry(format_genre(&e.book.subgenre)).push(e),
            Genre::NonFiction => non_fiction.entry(format_genre(&e.book.subgenre)).push(e),
            Genre::Poetry => poetry.push(e),
        }
    }

    let mut children = Vec::with_capacity(3);
    if !fiction.groups.is_empty() {
        children.push((
            Genre::Fiction.label().to_string(),
            GroupNode::Branch(sized_leaves(fiction)?),
        ));
    }
    if !non_fiction.groups.is_empty() {
        children.push((
            Genre::NonFiction.label().to_string(),
            GroupNode::Branch(sized_leaves(non_fiction)?),
        ));
    }
    if !poetry.is_empty() {
        children.push((Genre::Poetry.label().to_string(), leaf(poetry)?));
    }
    Ok(GroupNode::Branch(children))
}

fn purchase_bucket(e: &Entry) -> &'static str {
    match e.purchase.location_type {
        LocationType::Gift => "Gift",
        LocationType::Website | LocationType::AffiliateWebsite => "Online",
        LocationType::Bookstore if e.purchase.is_library() => "Library",
        LocationType::Bookstore => "Bookstore",
    }
}

fn by_purchase_info(entries: &[Entry]) -> Result<GroupNode<'_>> {
    let mut buckets: Buckets<String, Vec<&Entry>> = Buckets::new();
    for e in entries {
        buckets.entry(purchase_bucket(e).to_string()).push(e);
    }
    Ok(GroupNode::Branch(sized_leaves(buckets)?))
}

fn by_rating(entries: &[Entry]) -> Result<GroupNode<'_>> {
    // Index 0 holds five stars, index 5 holds zero.
    let mut buckets: [Vec<&Entry>; 6] = Default::default();
    for e in entries {
        if e.rating > 5 {
            return Err(ReadingLogError::InvalidRating(e.rating));
        }
        buckets[usize::from(5 - e.rating)].push(e);
    }

    let children = buckets
        .into_iter()
        .enumerate()
        .map(|(i, v)| Ok((star_rating(5 - i as u8), leaf(v)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(GroupNode::Branch(children))
}
