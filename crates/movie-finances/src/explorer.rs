//! Filter, sort, and paginate the annotated movie collection
//!
//! The pipeline is stateless and deterministic: identical inputs produce an
//! identical page in identical order, which the exporters rely on.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::metrics::{AnnotatedMovie, BudgetCategory, PerformanceRating};

/// Filter parameters for one pipeline invocation. `None` band filters mean
/// "All"; the incomplete gate is off by default, hiding records without
/// complete financial data.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub rating: Option<PerformanceRating>,
    pub category: Option<BudgetCategory>,
    pub include_incomplete: bool,
}

/// Sortable record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Studio,
    ReleaseYear,
    Budget,
    Revenue,
    Roi,
    Profit,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "title" => Ok(SortField::Title),
            "studio" => Ok(SortField::Studio),
            "year" | "release year" => Ok(SortField::ReleaseYear),
            "budget" => Ok(SortField::Budget),
            "revenue" => Ok(SortField::Revenue),
            "roi" => Ok(SortField::Roi),
            "profit" => Ok(SortField::Profit),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Revenue,
            direction: SortDirection::Descending,
        }
    }
}

/// Zero-based page index and page size
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub page: usize,
    pub size: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

/// Sort key for one record: text fields compare case-insensitively, numeric
/// fields normalize missing values to 0 so ordering stays deterministic.
enum SortKey {
    Text(String),
    Number(f64),
}

fn sort_key(movie: &AnnotatedMovie, field: SortField) -> SortKey {
    match field {
        SortField::Title => SortKey::Text(movie.record.title.to_lowercase()),
        SortField::Studio => SortKey::Text(movie.record.studio().to_lowercase()),
        SortField::ReleaseYear => SortKey::Number(movie.record.year().unwrap_or(0) as f64),
        SortField::Budget => SortKey::Number(movie.record.budget.unwrap_or(0.0)),
        SortField::Revenue => SortKey::Number(movie.record.revenue.unwrap_or(0.0)),
        SortField::Roi => SortKey::Number(movie.metrics.roi.unwrap_or(0.0)),
        SortField::Profit => SortKey::Number(movie.metrics.profit.unwrap_or(0.0)),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        // Keys are normalized, never NaN
        (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Less,
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Greater,
    }
}

fn matches(movie: &AnnotatedMovie, criteria: &FilterCriteria) -> bool {
    if let Some(search) = criteria.search.as_deref() {
        let needle = search.to_lowercase();
        if !needle.is_empty() {
            let in_title = movie.record.title.to_lowercase().contains(&needle);
            let in_studio = movie.record.studio().to_lowercase().contains(&needle);
            if !in_title && !in_studio {
                return false;
            }
        }
    }

    if let Some(rating) = criteria.rating {
        if movie.metrics.rating != rating {
            return false;
        }
    }

    if let Some(category) = criteria.category {
        if movie.metrics.category != category {
            return false;
        }
    }

    if !criteria.include_incomplete && !movie.metrics.is_complete() {
        return false;
    }

    true
}

/// Run the full pipeline: predicate filter, stable single-key sort, page
/// slice. Returns the requested page plus the total match count before
/// pagination. A page past the end is empty, never an error.
pub fn apply<'a>(
    movies: &'a [AnnotatedMovie],
    criteria: &FilterCriteria,
    sort: &SortSpec,
    page: &PageSpec,
) -> (Vec<&'a AnnotatedMovie>, usize) {
    let mut filtered: Vec<&AnnotatedMovie> =
        movies.iter().filter(|m| matches(m, criteria)).collect();

    // slice::sort_by is stable; descending swaps operands inside the
    // comparator so ties keep their original relative order either way
    filtered.sort_by(|a, b| {
        let (ka, kb) = (sort_key(a, sort.field), sort_key(b, sort.field));
        match sort.direction {
            SortDirection::Ascending => compare_keys(&ka, &kb),
            SortDirection::Descending => compare_keys(&kb, &ka),
        }
    });

    let total = filtered.len();
    let start = page.page.saturating_mul(page.size).min(total);
    let end = start.saturating_add(page.size).min(total);

    (filtered[start..end].to_vec(), total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::annotate;
    use crate::model::MovieRecord;

    fn record(id: i64, title: &str, budget: Option<f64>, revenue: Option<f64>) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            studio_name: Some(format!("Studio {}", id)),
            release_year: Some(2020),
            release_date: None,
            budget,
            revenue,
            genres: Vec::new(),
        }
    }

    fn fixture() -> Vec<crate::metrics::AnnotatedMovie> {
        annotate(vec![
            record(1, "Alpha", Some(10_000_000.0), Some(40_000_000.0)), // 300% Excellent
            record(2, "Beta", Some(100_000_000.0), Some(90_000_000.0)), // -10% Break Even
            record(3, "Gamma", Some(5_000_000.0), None),                // incomplete
        ])
    }

    #[test]
    fn test_incomplete_gate() {
        let movies = fixture();
        let (page, total) = apply(
            &movies,
            &FilterCriteria::default(),
            &SortSpec::default(),
            &PageSpec { page: 0, size: 10 },
        );
        assert_eq!(total, 2);
        assert!(page.iter().all(|m| m.record.title != "Gamma"));

        let criteria = FilterCriteria {
            include_incomplete: true,
            ..Default::default()
        };
        let (_, total) = apply(&movies, &criteria, &SortSpec::default(), &PageSpec::default());
        assert_eq!(total, 3);
    }

    #[test]
    fn test_search_matches_title_or_studio() {
        let movies = fixture();
        let criteria = FilterCriteria {
            search: Some("alph".to_string()),
            ..Default::default()
        };
        let (page, total) = apply(&movies, &criteria, &SortSpec::default(), &PageSpec::default());
        assert_eq!(total, 1);
        assert_eq!(page[0].record.title, "Alpha");

        let criteria = FilterCriteria {
            search: Some("studio 2".to_string()),
            ..Default::default()
        };
        let (page, _) = apply(&movies, &criteria, &SortSpec::default(), &PageSpec::default());
        assert_eq!(page[0].record.title, "Beta");
    }

    #[test]
    fn test_roi_descending_and_page_slice() {
        let movies = fixture();
        let sort = SortSpec {
            field: SortField::Roi,
            direction: SortDirection::Descending,
        };

        let (page, total) = apply(
            &movies,
            &FilterCriteria::default(),
            &sort,
            &PageSpec { page: 0, size: 10 },
        );
        assert_eq!(total, 2);
        assert_eq!(page[0].record.title, "Alpha");
        assert_eq!(page[1].record.title, "Beta");

        // Page size 1, page 0 holds only the top record
        let (page, _) = apply(
            &movies,
            &FilterCriteria::default(),
            &sort,
            &PageSpec { page: 0, size: 1 },
        );
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].record.title, "Alpha");
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let movies = fixture();
        let (page, total) = apply(
            &movies,
            &FilterCriteria::default(),
            &SortSpec::default(),
            &PageSpec { page: 9, size: 10 },
        );
        assert_eq!(total, 2);
        assert!(page.is_empty());
    }

    #[test]
    fn test_stability_under_ties_both_directions() {
        // Identical revenue everywhere: order must match insertion order
        // regardless of direction
        let movies = annotate(vec![
            record(1, "One", Some(1_000_000.0), Some(2_000_000.0)),
            record(2, "Two", Some(1_000_000.0), Some(2_000_000.0)),
            record(3, "Three", Some(1_000_000.0), Some(2_000_000.0)),
        ]);

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sort = SortSpec {
                field: SortField::Revenue,
                direction,
            };
            let (page, _) = apply(
                &movies,
                &FilterCriteria::default(),
                &sort,
                &PageSpec { page: 0, size: 10 },
            );
            let ids: Vec<i64> = page.iter().map(|m| m.record.id).collect();
            assert_eq!(ids, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let movies = fixture();
        let criteria = FilterCriteria::default();
        let sort = SortSpec {
            field: SortField::Roi,
            direction: SortDirection::Descending,
        };
        let page = PageSpec { page: 0, size: 10 };

        let (first, _) = apply(&movies, &criteria, &sort, &page);
        let (second, _) = apply(&movies, &criteria, &sort, &page);
        let a: Vec<i64> = first.iter().map(|m| m.record.id).collect();
        let b: Vec<i64> = second.iter().map(|m| m.record.id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_band_filters() {
        let movies = fixture();
        let criteria = FilterCriteria {
            rating: Some(PerformanceRating::BreakEven),
            ..Default::default()
        };
        let (page, total) = apply(&movies, &criteria, &SortSpec::default(), &PageSpec::default());
        assert_eq!(total, 1);
        assert_eq!(page[0].record.title, "Beta");

        let criteria = FilterCriteria {
            category: Some(BudgetCategory::LowBudget),
            ..Default::default()
        };
        let (page, _) = apply(&movies, &criteria, &SortSpec::default(), &PageSpec::default());
        assert_eq!(page[0].record.title, "Alpha");
    }
}
