//! Sorting and pagination requests and the page result shape.

use serde::{Deserialize, Serialize};

/// Sort direction of one ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One ordering term: an entity property path plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

/// Ordered list of sort terms. Earlier terms take precedence.
///
/// Property paths name entity fields (`"age"`, `"attendee.last_name"`),
/// never raw columns; each repository resolves them against its own list of
/// sortable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    /// No explicit ordering; results come back in id order.
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(property: impl Into<String>, direction: Direction) -> Self {
        Self::unsorted().then(property, direction)
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::by(property, Direction::Asc)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::by(property, Direction::Desc)
    }

    /// Appends a lower-precedence term.
    pub fn then(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.orders.push(Order {
            property: property.into(),
            direction,
        });
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    pub fn sorted(page: u32, size: u32, sort: Sort) -> Self {
        Self { page, size, sort }
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Page, PageRequest, Sort};

    fn page(number: u32, size: u32, total_elements: u64) -> Page<u8> {
        Page {
            content: Vec::new(),
            number,
            size,
            total_elements,
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(page(0, 2, 5).total_pages(), 3);
        assert_eq!(page(0, 5, 5).total_pages(), 1);
        assert_eq!(page(0, 5, 0).total_pages(), 0);
    }

    #[test]
    fn first_and_last_page_flags() {
        let first = page(0, 2, 5);
        assert!(first.is_first());
        assert!(first.has_next());

        let last = page(2, 2, 5);
        assert!(last.is_last());
        assert!(last.has_previous());
    }

    #[test]
    fn next_keeps_size_and_sort() {
        let request = PageRequest::sorted(1, 10, Sort::desc("age"));
        let next = request.next();
        assert_eq!(next.page, 2);
        assert_eq!(next.size, 10);
        assert_eq!(next.sort.orders()[0].direction, Direction::Desc);
        assert_eq!(next.offset(), 20);
    }
}
