use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::StatsError;

// @module: Works metadata aggregation

/// Genre categories the distribution reports, in display order.
pub const GENRE_CATEGORIES: [&str; 3] = ["comedy", "tragedy", "na"];

/// Number of authors the ranking keeps.
pub const TOP_AUTHOR_LIMIT: usize = 10;

const AUTHOR_COLUMN: &str = "author-name";
const GENRE_COLUMN: &str = "genre";
const YEAR_COLUMN: &str = "year";

/// One row of a works metadata table.
///
/// Every field is optional per row; each aggregation checks that the column
/// it needs exists in the table header instead.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkRecord {
    /// Name of the author, as spelled in the table
    #[serde(rename = "author-name", default)]
    pub author_name: Option<String>,

    /// Genre of the work
    #[serde(default)]
    pub genre: Option<String>,

    /// Year of publication or premiere, free-form
    #[serde(default)]
    pub year: Option<String>,
}

/// A works table loaded from CSV, together with the columns its header
/// carries.
#[derive(Debug, Clone)]
pub struct WorksTable {
    /// Deserialized rows
    pub records: Vec<WorkRecord>,
    columns: Vec<String>,
    source: String,
}

impl WorksTable {
    /// Load a works table from a CSV file with headers.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, StatsError> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| StatsError::Table(format!("{}: {}", source, e)))?;
        let columns = reader
            .headers()
            .map_err(|e| StatsError::Table(format!("{}: {}", source, e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: WorkRecord =
                row.map_err(|e| StatsError::Table(format!("{}: {}", source, e)))?;
            records.push(record);
        }

        Ok(Self {
            records,
            columns,
            source,
        })
    }

    /// Build a table from rows directly, all columns assumed present.
    pub fn from_records(records: Vec<WorkRecord>) -> Self {
        Self {
            records,
            columns: vec![
                AUTHOR_COLUMN.to_string(),
                GENRE_COLUMN.to_string(),
                YEAR_COLUMN.to_string(),
            ],
            source: "<memory>".to_string(),
        }
    }

    fn require_column(&self, column: &str) -> Result<(), StatsError> {
        if self.columns.iter().any(|c| c == column) {
            Ok(())
        } else {
            Err(StatsError::MissingColumn {
                column: column.to_string(),
                file: self.source.clone(),
            })
        }
    }
}

/// Per-dataset counts for one genre category.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GenreCount {
    /// Normalized genre category
    pub category: String,

    /// Works outside the reference corpus
    pub outside_corpus: u32,

    /// Works in the reference corpus
    pub in_corpus: u32,
}

/// Per-dataset counts for one author.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AuthorCount {
    /// Author name as spelled in the tables
    pub name: String,

    /// Works outside the reference corpus
    pub outside_corpus: u32,

    /// Works in the reference corpus
    pub in_corpus: u32,

    /// Combined count across both tables
    pub total: u32,
}

/// Per-dataset counts for one decade.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DecadeCount {
    /// Decade start year (1817 counts under 1810)
    pub decade: i32,

    /// Works outside the reference corpus
    pub outside_corpus: u32,

    /// Works in the reference corpus
    pub in_corpus: u32,
}

/// Count normalized genres per dataset over the fixed category order.
///
/// Missing and empty genres normalize to "na"; everything else is
/// lowercased. Genres outside [`GENRE_CATEGORIES`] are not counted.
pub fn genre_distribution(
    outside: &WorksTable,
    corpus: &WorksTable,
) -> Result<Vec<GenreCount>, StatsError> {
    outside.require_column(GENRE_COLUMN)?;
    corpus.require_column(GENRE_COLUMN)?;

    Ok(GENRE_CATEGORIES
        .iter()
        .map(|category| GenreCount {
            category: category.to_string(),
            outside_corpus: count_genre(&outside.records, category),
            in_corpus: count_genre(&corpus.records, category),
        })
        .collect())
}

fn normalized_genre(record: &WorkRecord) -> String {
    match record.genre.as_deref().map(str::trim) {
        None | Some("") => "na".to_string(),
        Some(genre) => genre.to_lowercase(),
    }
}

fn count_genre(records: &[WorkRecord], category: &str) -> u32 {
    records
        .iter()
        .filter(|r| normalized_genre(r) == category)
        .count() as u32
}

/// Rank authors by combined work count across both tables.
///
/// Rows without an author name are dropped. Ties are broken by name so the
/// ranking is deterministic; at most [`TOP_AUTHOR_LIMIT`] entries are kept.
pub fn top_authors(
    outside: &WorksTable,
    corpus: &WorksTable,
) -> Result<Vec<AuthorCount>, StatsError> {
    outside.require_column(AUTHOR_COLUMN)?;
    corpus.require_column(AUTHOR_COLUMN)?;

    let outside_counts = author_counts(&outside.records);
    let corpus_counts = author_counts(&corpus.records);

    let names: BTreeSet<&String> = outside_counts.keys().chain(corpus_counts.keys()).collect();
    let mut ranking: Vec<AuthorCount> = names
        .into_iter()
        .map(|name| {
            let outside_count = outside_counts.get(name).copied().unwrap_or(0);
            let corpus_count = corpus_counts.get(name).copied().unwrap_or(0);
            AuthorCount {
                name: name.clone(),
                outside_corpus: outside_count,
                in_corpus: corpus_count,
                total: outside_count + corpus_count,
            }
        })
        .collect();

    ranking.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    ranking.truncate(TOP_AUTHOR_LIMIT);
    Ok(ranking)
}

fn author_counts(records: &[WorkRecord]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(name) = record.author_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                *counts.entry(name.to_string()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Count works per decade over the sorted union of decades in either table.
///
/// Rows with a missing or non-numeric year are dropped. When neither table
/// yields a single valid year the aggregation fails.
pub fn works_by_decade(
    outside: &WorksTable,
    corpus: &WorksTable,
) -> Result<Vec<DecadeCount>, StatsError> {
    outside.require_column(YEAR_COLUMN)?;
    corpus.require_column(YEAR_COLUMN)?;

    let outside_counts = decade_counts(&outside.records);
    let corpus_counts = decade_counts(&corpus.records);

    if outside_counts.is_empty() && corpus_counts.is_empty() {
        return Err(StatsError::NoYearData);
    }

    let decades: BTreeSet<i32> = outside_counts
        .keys()
        .chain(corpus_counts.keys())
        .copied()
        .collect();

    Ok(decades
        .into_iter()
        .map(|decade| DecadeCount {
            decade,
            outside_corpus: outside_counts.get(&decade).copied().unwrap_or(0),
            in_corpus: corpus_counts.get(&decade).copied().unwrap_or(0),
        })
        .collect())
}

fn decade_counts(records: &[WorkRecord]) -> BTreeMap<i32, u32> {
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(year) = record.year.as_deref().and_then(parse_year) {
            *counts.entry(year.div_euclid(10) * 10).or_insert(0) += 1;
        }
    }
    counts
}

/// Parse a free-form year cell; "1817" and "1817.0" both count.
fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value
        .parse::<i32>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|y| y as i32))
}
