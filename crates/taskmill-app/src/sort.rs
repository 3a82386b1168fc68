//! Declarative sort criteria and comparator composition.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use taskmill_core::Task;
use thiserror::Error;

/// Boxed task comparator, as accepted by [`crate::TaskProcessingEngine::sort_by_criteria`].
pub type Comparator = Box<dyn Fn(&Task, &Task) -> Ordering>;

/// Errors produced while parsing sort tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortSpecError {
    /// The key names no sortable task field.
    #[error("unknown sort key `{0}`")]
    UnknownKey(String),
    /// The direction suffix is neither `asc` nor `desc`.
    #[error("unknown sort direction in `{0}`")]
    UnknownDirection(String),
}

/// Sortable task field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Numeric identifier.
    Id,
    /// Title, byte-wise.
    Title,
    /// Status in declaration order.
    Status,
    /// Priority from low to critical.
    Priority,
    /// Estimate; unestimated tasks sort last.
    EstimatedHours,
    /// Deadline; undated tasks sort last.
    DueDate,
    /// Creation time.
    CreatedAt,
}

impl SortKey {
    fn compare(self, a: &Task, b: &Task, direction: SortDirection) -> Ordering {
        match self {
            Self::Id => direction.apply(a.id.cmp(&b.id)),
            Self::Title => direction.apply(a.title.cmp(&b.title)),
            Self::Status => direction.apply(a.status.cmp(&b.status)),
            Self::Priority => direction.apply(a.priority.cmp(&b.priority)),
            Self::EstimatedHours => compare_present_first(a.estimated_hours, b.estimated_hours, direction),
            Self::DueDate => compare_present_first(a.due_date, b.due_date, direction),
            Self::CreatedAt => direction.apply(a.created_at.cmp(&b.created_at)),
        }
    }
}

impl FromStr for SortKey {
    type Err = SortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "estimated_hours" | "estimate" => Ok(Self::EstimatedHours),
            "due_date" | "due" => Ok(Self::DueDate),
            "created_at" | "created" => Ok(Self::CreatedAt),
            _ => Err(SortSpecError::UnknownKey(s.to_owned())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::EstimatedHours => "estimated_hours",
            Self::DueDate => "due_date",
            Self::CreatedAt => "created_at",
        })
    }
}

/// Ascending or descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// One sort criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to compare.
    pub key: SortKey,
    /// Direction of the comparison.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending criterion on `key`.
    #[must_use]
    pub const fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Descending criterion on `key`.
    #[must_use]
    pub const fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }

    /// Compare two tasks under this criterion.
    #[must_use]
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        self.key.compare(a, b, self.direction)
    }

    /// Box the criterion as a standalone comparator.
    #[must_use]
    pub fn comparator(self) -> Comparator {
        Box::new(move |a: &Task, b: &Task| self.compare(a, b))
    }
}

/// Fold comparators left to right: the first is the primary key, later ones break ties.
///
/// With no comparators every pair compares equal.
pub fn compose<C>(comparators: &[C], a: &Task, b: &Task) -> Ordering
where
    C: Fn(&Task, &Task) -> Ordering,
{
    comparators
        .iter()
        .fold(Ordering::Equal, |ordering, comparator| {
            ordering.then_with(|| comparator(a, b))
        })
}

/// Parse `key` or `key:asc|desc` tokens into sort specs.
///
/// # Errors
/// Returns an error for unknown keys or directions.
pub fn parse_sort_specs(input: &[String]) -> Result<Vec<SortSpec>, SortSpecError> {
    input
        .iter()
        .map(|token| {
            let (key, direction) = match token.split_once(':') {
                Some((key, dir)) => (key, Some(dir.trim().to_ascii_lowercase())),
                None => (token.as_str(), None),
            };
            let key: SortKey = key.parse()?;
            let direction = match direction.as_deref() {
                None | Some("asc") => SortDirection::Asc,
                Some("desc") => SortDirection::Desc,
                Some(_) => return Err(SortSpecError::UnknownDirection(token.clone())),
            };
            Ok(SortSpec { key, direction })
        })
        .collect()
}

fn compare_present_first<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => direction.apply(left.cmp(&right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmill_core::Priority;

    #[test]
    fn parses_keys_and_directions() {
        let tokens = vec![
            "priority:desc".to_owned(),
            "Title".to_owned(),
            "due-date:ASC".to_owned(),
        ];
        let specs = parse_sort_specs(&tokens).unwrap_or_else(|err| panic!("parse specs: {err}"));
        assert_eq!(
            specs,
            vec![
                SortSpec::desc(SortKey::Priority),
                SortSpec::asc(SortKey::Title),
                SortSpec::asc(SortKey::DueDate),
            ]
        );
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            parse_sort_specs(&["owner".to_owned()]),
            Err(SortSpecError::UnknownKey("owner".to_owned()))
        );
        assert_eq!(
            parse_sort_specs(&["title:sideways".to_owned()]),
            Err(SortSpecError::UnknownDirection("title:sideways".to_owned()))
        );
    }

    #[test]
    fn unestimated_tasks_sort_last_in_both_directions() {
        let none = Task::new(1, "a");
        let small = Task::new(2, "b").with_estimated_hours(Some(1));
        let large = Task::new(3, "c").with_estimated_hours(Some(8));

        let asc = SortSpec::asc(SortKey::EstimatedHours);
        assert_eq!(asc.compare(&small, &large), Ordering::Less);
        assert_eq!(asc.compare(&none, &small), Ordering::Greater);

        let desc = SortSpec::desc(SortKey::EstimatedHours);
        assert_eq!(desc.compare(&small, &large), Ordering::Greater);
        assert_eq!(desc.compare(&none, &large), Ordering::Greater);
    }

    #[test]
    fn compose_breaks_ties_left_to_right() {
        let a = Task::new(1, "b").with_priority(Priority::High);
        let b = Task::new(2, "a").with_priority(Priority::High);
        let comparators = vec![
            SortSpec::desc(SortKey::Priority).comparator(),
            SortSpec::asc(SortKey::Title).comparator(),
        ];
        assert_eq!(compose(&comparators, &a, &b), Ordering::Greater);

        let none: Vec<Comparator> = Vec::new();
        assert_eq!(compose(&none, &a, &b), Ordering::Equal);
    }

    #[test]
    fn keys_display_their_canonical_token() {
        let key: SortKey = "estimate"
            .parse()
            .unwrap_or_else(|err| panic!("parse key: {err}"));
        assert_eq!(key.to_string(), "estimated_hours");
    }
}
