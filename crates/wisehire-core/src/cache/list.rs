use chrono::{DateTime, Utc};
use tracing::debug;

use crate::api::WriteOutcome;
use crate::models::{Identified, Page};

/// The last fetched page of a collection plus its refetch state.
#[derive(Debug, Clone)]
pub struct EntityList<T> {
    items: Vec<T>,
    count: Option<u64>,
    has_next: bool,
    has_previous: bool,
    page: u32,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            count: None,
            has_next: false,
            has_previous: false,
            page: 1,
            fetched_at: None,
            stale: true,
        }
    }
}

impl<T> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly fetched page.
    pub fn replace(&mut self, page_number: u32, page: Page<T>) {
        self.has_next = page.has_next();
        self.has_previous = page.has_previous();
        self.count = page.count;
        self.items = page.results;
        self.page = page_number.max(1);
        self.fetched_at = Some(Utc::now());
        self.stale = false;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Total across all pages when the backend reported it.
    pub fn total(&self) -> usize {
        self.count.map(|c| c as usize).unwrap_or(self.items.len())
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn needs_refetch(&self) -> bool {
        self.stale || self.fetched_at.is_none()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn age_display(&self) -> String {
        match self.fetched_at {
            Some(at) => age_display((Utc::now() - at).num_minutes()),
            None => "never".to_string(),
        }
    }
}

impl<T: Identified> EntityList<T> {
    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Patch an entity in place, or prepend it if it is new.
    pub fn upsert(&mut self, entity: T) {
        match self.items.iter().position(|item| item.id() == entity.id()) {
            Some(index) => self.items[index] = entity,
            None => {
                self.items.insert(0, entity);
                self.count = self.count.map(|c| c + 1);
            }
        }
    }

    /// Drop an entity. Returns whether it was present.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let removed = self.items.len() != before;
        if removed {
            self.count = self.count.map(|c| c.saturating_sub(1));
        }
        removed
    }

    /// Apply the result of a create or update.
    ///
    /// Returns `true` when the list was patched. An `Accepted` outcome
    /// carries no entity to patch with, so the list is marked stale instead.
    pub fn apply(&mut self, outcome: WriteOutcome<T>) -> bool {
        match outcome {
            WriteOutcome::Entity(entity) => {
                self.upsert(entity);
                true
            }
            WriteOutcome::Accepted(_) => {
                debug!("Write returned no entity, list needs refetch");
                self.invalidate();
                false
            }
        }
    }
}

/// Render an age in minutes as "just now", "5m ago", "2h ago" or "3d ago".
pub fn age_display(minutes: i64) -> String {
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        // 1h 30m+ rounds up to 2h
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerCompany;
    use serde_json::json;

    fn company(id: i64, name: &str) -> CustomerCompany {
        serde_json::from_value(json!({"id": id, "name": name, "code": format!("C{}", id)})).unwrap()
    }

    fn page_of(items: Vec<CustomerCompany>) -> Page<CustomerCompany> {
        Page {
            count: Some(items.len() as u64),
            next: Some("http://x/?page=2".to_string()),
            previous: None,
            results: items,
        }
    }

    #[test]
    fn test_paging_state_needs_no_ids() {
        let mut list: EntityList<String> = EntityList::new();
        list.replace(
            2,
            Page {
                count: Some(12),
                next: None,
                previous: Some("?page=1".to_string()),
                results: vec!["a".to_string(), "b".to_string()],
            },
        );
        assert_eq!(list.page(), 2);
        assert_eq!(list.total(), 12);
        assert!(list.has_previous());
        assert!(!list.has_next());
        assert!(list.fetched_at().is_some());
    }

    #[test]
    fn test_fresh_list_needs_fetch() {
        let list: EntityList<CustomerCompany> = EntityList::new();
        assert!(list.needs_refetch());
        assert_eq!(list.age_display(), "never");
    }

    #[test]
    fn test_replace_then_patch_in_place() {
        let mut list = EntityList::new();
        list.replace(1, page_of(vec![company(1, "Acme"), company(2, "Globex")]));
        assert!(!list.needs_refetch());
        assert!(list.has_next());
        assert_eq!(list.age_display(), "just now");

        let mut renamed = company(2, "Globex Corp");
        renamed.is_active = false;
        assert!(list.apply(WriteOutcome::Entity(renamed)));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(2).map(|c| c.name.as_str()), Some("Globex Corp"));
        assert!(!list.needs_refetch());
    }

    #[test]
    fn test_new_entity_is_prepended() {
        let mut list = EntityList::new();
        list.replace(1, page_of(vec![company(1, "Acme")]));
        list.upsert(company(9, "Initech"));
        assert_eq!(list.items()[0].id, 9);
        assert_eq!(list.total(), 2);
    }

    #[test]
    fn test_remove_and_accepted_write() {
        let mut list = EntityList::new();
        list.replace(1, page_of(vec![company(1, "Acme"), company(2, "Globex")]));
        assert!(list.remove(1));
        assert!(!list.remove(1));
        assert_eq!(list.total(), 1);

        assert!(!list.apply(WriteOutcome::Accepted(json!({"name": "Hooli"}))));
        assert!(list.needs_refetch());
    }

    #[test]
    fn test_age_display() {
        assert_eq!(age_display(-3), "just now");
        assert_eq!(age_display(0), "just now");
        assert_eq!(age_display(5), "5m ago");
        assert_eq!(age_display(89), "1h ago");
        assert_eq!(age_display(90), "2h ago");
        assert_eq!(age_display(1440 + 11 * 60), "1d ago");
        assert_eq!(age_display(1440 + 12 * 60), "2d ago");
    }
}
