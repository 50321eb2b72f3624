use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Requested page window. An absent or zero `page_size` means unpaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl PageSpec {
    #[must_use]
    pub const fn unpaged() -> Self {
        Self {
            page_number: None,
            page_size: None,
        }
    }

    #[must_use]
    pub const fn of(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }

    /// Check bounds before any rows are read.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` on a negative number or size, or a size above
    /// `max_page_size`.
    pub fn validate(&self, max_page_size: u64) -> Result<(), CoreError> {
        if let Some(n) = self.page_number
            && n < 0
        {
            return Err(CoreError::validation(format!(
                "page_number must be >= 0, got {n}"
            )));
        }
        if let Some(size) = self.page_size {
            if size < 0 {
                return Err(CoreError::validation(format!(
                    "page_size must be >= 0, got {size}"
                )));
            }
            if size.unsigned_abs() > max_page_size {
                return Err(CoreError::validation(format!(
                    "page_size {size} exceeds the maximum of {max_page_size}"
                )));
            }
        }
        Ok(())
    }

    fn window(self) -> Option<(usize, usize)> {
        let size = usize::try_from(self.page_size.unwrap_or(0)).unwrap_or(0);
        if size == 0 {
            return None;
        }
        let number = usize::try_from(self.page_number.unwrap_or(0)).unwrap_or(0);
        Some((number, size))
    }
}

/// One window of a sorted, filtered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[allow(clippy::struct_excessive_bools)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub number_of_elements: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub is_first: bool,
    pub is_last: bool,
    pub has_next: bool,
    pub has_previous: bool,
    pub is_empty: bool,
    pub has_content: bool,
}

impl<T> Page<T> {
    /// Replace the content, keeping the window metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            is_first: self.is_first,
            is_last: self.is_last,
            has_next: self.has_next,
            has_previous: self.has_previous,
            is_empty: self.is_empty,
            has_content: self.has_content,
        }
    }

    /// Mutable access to the rows on this page.
    pub fn content_mut(&mut self) -> &mut [T] {
        &mut self.content
    }
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Slice an already filtered and sorted result into the requested page.
///
/// A page past the end yields an empty page whose totals still describe the
/// full result. Callers validate `spec` first.
#[must_use]
pub fn paginate<T>(rows: Vec<T>, spec: PageSpec) -> Page<T> {
    let total = rows.len();

    let Some((number, size)) = spec.window() else {
        return Page {
            number: 0,
            size: to_u64(total),
            number_of_elements: to_u64(total),
            total_elements: to_u64(total),
            total_pages: 1,
            is_first: true,
            is_last: true,
            has_next: false,
            has_previous: false,
            is_empty: total == 0,
            has_content: total > 0,
            content: rows,
        };
    };

    let total_pages = total.div_ceil(size);
    let start = number.saturating_mul(size).min(total);
    let content: Vec<T> = rows.into_iter().skip(start).take(size).collect();
    let count = content.len();

    Page {
        content,
        number: to_u64(number),
        size: to_u64(size),
        number_of_elements: to_u64(count),
        total_elements: to_u64(total),
        total_pages: to_u64(total_pages),
        is_first: number == 0,
        is_last: number + 1 >= total_pages,
        has_next: number + 1 < total_pages,
        has_previous: number > 0,
        is_empty: count == 0,
        has_content: count > 0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn unpaged_is_a_single_page() {
        let page = paginate((1..=9).collect::<Vec<i32>>(), PageSpec::unpaged());
        assert_eq!(page.content.len(), 9);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.size, 9);
        assert!(page.is_first && page.is_last && !page.has_next);

        let zero = paginate(vec![1, 2], PageSpec::of(3, 0));
        assert_eq!(zero.number, 0);
        assert_eq!(zero.number_of_elements, 2);
    }

    #[test]
    fn empty_unpaged_result() {
        let page = paginate(Vec::<i32>::new(), PageSpec::unpaged());
        assert!(page.is_empty);
        assert!(!page.has_content);
        assert_eq!(page.total_pages, 1);
    }

    #[rstest]
    #[case(0, vec![1, 2, 3, 4], true, false, true, false)]
    #[case(1, vec![5, 6, 7, 8], false, false, true, true)]
    #[case(2, vec![9], false, true, false, true)]
    fn windows_of_four(
        #[case] number: i64,
        #[case] expected: Vec<i32>,
        #[case] is_first: bool,
        #[case] is_last: bool,
        #[case] has_next: bool,
        #[case] has_previous: bool,
    ) {
        let page = paginate((1..=9).collect(), PageSpec::of(number, 4));
        assert_eq!(page.content, expected);
        assert_eq!(page.total_elements, 9);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.size, 4);
        assert_eq!(page.number_of_elements, to_u64(page.content.len()));
        assert_eq!(page.is_first, is_first);
        assert_eq!(page.is_last, is_last);
        assert_eq!(page.has_next, has_next);
        assert_eq!(page.has_previous, has_previous);
    }

    #[test]
    fn past_the_end_is_empty() {
        let page = paginate((1..=9).collect::<Vec<i32>>(), PageSpec::of(7, 4));
        assert!(page.content.is_empty());
        assert!(page.is_empty);
        assert!(page.is_last);
        assert!(!page.has_next);
        assert_eq!(page.total_elements, 9);
    }

    #[test]
    fn pages_stitch_back_together() {
        let all: Vec<i32> = (1..=23).collect();
        let mut stitched = Vec::new();
        let first = paginate(all.clone(), PageSpec::of(0, 5));
        for n in 0..first.total_pages {
            let n = i64::try_from(n).unwrap();
            stitched.extend(paginate(all.clone(), PageSpec::of(n, 5)).content);
        }
        assert_eq!(stitched, all);
    }

    #[rstest]
    #[case(PageSpec::of(-1, 10))]
    #[case(PageSpec::of(0, -5))]
    #[case(PageSpec::of(0, 1001))]
    fn invalid_specs(#[case] spec: PageSpec) {
        assert!(matches!(
            spec.validate(1000),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn valid_specs() {
        assert!(PageSpec::unpaged().validate(1000).is_ok());
        assert!(PageSpec::of(3, 1000).validate(1000).is_ok());
    }

    #[test]
    fn map_keeps_metadata() {
        let page = paginate(vec![1, 2, 3], PageSpec::of(0, 2)).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.total_pages, 2);
    }
}
