//! Study ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Study;
use super::collate;

/// Column a study list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Publication year, compared numerically.
    Year,
    /// Journal name.
    Journal,
    /// Title.
    Title,
    /// Authors.
    Authors,
}

impl SortKey {
    /// Columns in display order.
    pub const ALL: [Self; 4] = [Self::Year, Self::Journal, Self::Title, Self::Authors];

    /// Column header label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Journal => "Journal",
            Self::Title => "Title",
            Self::Authors => "Authors",
        }
    }

    /// Compare two studies on this column, ascending.
    #[must_use]
    pub fn compare(self, a: &Study, b: &Study) -> Ordering {
        match self {
            Self::Year => a.year_or_zero().cmp(&b.year_or_zero()),
            Self::Journal => collate::compare(a.journal_or_empty(), b.journal_or_empty()),
            Self::Title => collate::compare(a.title_or_empty(), b.title_or_empty()),
            Self::Authors => collate::compare(a.authors_or_empty(), b.authors_or_empty()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "journal" => Ok(Self::Journal),
            "title" => Ok(Self::Title),
            "authors" | "author" => Ok(Self::Authors),
            other => Err(format!("unknown column '{other}' (year, journal, title, authors)")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Apply this direction to an ascending ordering.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Active column and direction. Defaults to newest studies first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    /// Column.
    pub key: SortKey,
    /// Direction.
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self { key: SortKey::Year, direction: SortDirection::Desc }
    }
}

impl SortOrder {
    /// Order for a clicked column header.
    ///
    /// The active column flips direction; any other column starts ascending.
    #[must_use]
    pub fn select(self, key: SortKey) -> Self {
        if key == self.key {
            Self { key, direction: self.direction.toggled() }
        } else {
            Self { key, direction: SortDirection::Asc }
        }
    }

    /// Compare two studies under this order.
    #[must_use]
    pub fn compare(&self, a: &Study, b: &Study) -> Ordering {
        self.direction.apply(self.key.compare(a, b))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key.label().to_lowercase(), self.direction)
    }
}

/// Sorted copy of `rows`. Ties keep their fetched order in both directions.
#[must_use]
pub fn sort_studies(rows: &[Study], order: SortOrder) -> Vec<Study> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| order.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn study(year: Option<i64>, title: Option<&str>) -> Study {
        Study { year, title: title.map(str::to_string), ..Default::default() }
    }

    #[test]
    fn test_select_same_key_toggles() {
        let order = SortOrder::default();
        assert_eq!(order.select(SortKey::Year).direction, SortDirection::Asc);
        assert_eq!(order.select(SortKey::Year).select(SortKey::Year), order);
    }

    #[test]
    fn test_select_new_key_resets_to_asc() {
        let order = SortOrder::default().select(SortKey::Title);
        assert_eq!(order, SortOrder { key: SortKey::Title, direction: SortDirection::Asc });
        let order = order.select(SortKey::Title).select(SortKey::Journal);
        assert_eq!(order.direction, SortDirection::Asc);
    }

    #[test]
    fn test_year_sort_treats_missing_as_zero() {
        let rows = vec![study(Some(2018), None), study(None, None), study(Some(2020), None)];
        let sorted = sort_studies(&rows, SortOrder::default());
        let years: Vec<_> = sorted.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![Some(2020), Some(2018), None]);
    }

    #[test]
    fn test_string_sort_treats_missing_as_empty() {
        let rows = vec![study(None, Some("beta")), study(None, None), study(None, Some("Alpha"))];
        let order = SortOrder { key: SortKey::Title, direction: SortDirection::Asc };
        let titles: Vec<_> =
            sort_studies(&rows, order).iter().map(|s| s.title_or_empty().to_string()).collect();
        assert_eq!(titles, vec!["", "Alpha", "beta"]);
    }

    #[test]
    fn test_ties_keep_fetched_order() {
        let rows = vec![study(Some(2020), Some("first")), study(Some(2020), Some("second"))];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sorted = sort_studies(&rows, SortOrder { key: SortKey::Year, direction });
            assert_eq!(sorted[0].title_or_empty(), "first");
        }
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("YEAR".parse::<SortKey>(), Ok(SortKey::Year));
        assert_eq!("author".parse::<SortKey>(), Ok(SortKey::Authors));
        assert!("citations".parse::<SortKey>().is_err());
    }
}
