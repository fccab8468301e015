//! Result ordering: hostname, then title, both case-insensitive.
//!
//! Ties beyond that keep arrival order: new rows go after equal ones.

use std::cmp::Ordering;

/// Case-insensitive comparison of two (domain, title) pairs
pub fn compare_domain_title(a_domain: &str, a_title: &str, b_domain: &str, b_title: &str) -> Ordering {
    cmp_ignore_case(a_domain, b_domain).then_with(|| cmp_ignore_case(a_title, b_title))
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Index at which a new (domain, title) row belongs in an already sorted
/// list: after every row that sorts before or equal to it.
pub fn insertion_index<T, F>(sorted: &[T], domain: &str, title: &str, key: F) -> usize
where
    F: Fn(&T) -> (&str, &str),
{
    sorted.partition_point(|existing| {
        let (d, t) = key(existing);
        compare_domain_title(d, t, domain, title) != Ordering::Greater
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_domain_then_title() {
        let mut rows = vec![
            ("zeta.com", "A"),
            ("Alpha.com", "b"),
            ("alpha.com", "A"),
            ("beta.com", "c"),
        ];
        rows.sort_by(|a, b| compare_domain_title(a.0, a.1, b.0, b.1));
        assert_eq!(
            rows,
            vec![
                ("alpha.com", "A"),
                ("Alpha.com", "b"),
                ("beta.com", "c"),
                ("zeta.com", "A"),
            ]
        );
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut rows = vec![
            ("example.com", "Same", 1),
            ("EXAMPLE.com", "same", 2),
            ("example.com", "SAME", 3),
        ];
        rows.sort_by(|a, b| compare_domain_title(a.0, a.1, b.0, b.1));
        let order: Vec<_> = rows.iter().map(|r| r.2).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_insertion_index_goes_after_equal_rows() {
        let rows = vec![("a.com", "x"), ("b.com", "x"), ("b.com", "x"), ("c.com", "x")];
        assert_eq!(insertion_index(&rows, "b.com", "X", |r| (r.0, r.1)), 3);
        assert_eq!(insertion_index(&rows, "0.com", "x", |r| (r.0, r.1)), 0);
        assert_eq!(insertion_index(&rows, "d.com", "x", |r| (r.0, r.1)), 4);
    }
}
