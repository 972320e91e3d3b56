//! Typed access to documents, with filtering and paging.

use crate::record::Record;
use crate::store::DocumentStore;
use crate::CoreResult;
use api_shared::pb::{ListReq, Pagination};
use serde_json::Value;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

/// Filters and paging for list operations.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub patient_id: Option<String>,
    pub national_health_id: Option<String>,
    pub pagination: Pagination,
}

impl ListQuery {
    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            ..Default::default()
        }
    }

    fn matches(&self, doc: &Value) -> bool {
        field_matches(doc, "patient_id", self.patient_id.as_deref())
            && field_matches(doc, "national_health_id", self.national_health_id.as_deref())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<ListReq> for ListQuery {
    fn from(req: ListReq) -> Self {
        Self {
            patient_id: non_blank(req.patient_id),
            national_health_id: non_blank(req.national_health_id),
            pagination: req.pagination.unwrap_or_default(),
        }
    }
}

fn field_matches(doc: &Value, field: &str, expected: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => doc.get(field).and_then(Value::as_str) == Some(expected),
    }
}

/// One page of results plus the filled-in pagination.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Wraps results that were not paged, such as an external search.
    pub fn unpaged(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self {
            items,
            pagination: Pagination {
                total_pages: i64::from(total > 0),
                total_records: total,
                ..Default::default()
            },
        }
    }
}

/// Compares two documents on a top-level field.
///
/// Missing or null values sort first; mixed types fall back to their JSON text.
fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let left = a.get(field).filter(|v| !v.is_null());
    let right = b.get(field).filter(|v| !v.is_null());
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// Sorts and slices `docs` according to `pagination`, returning the page and the filled
/// pagination.
pub fn paginate(mut docs: Vec<Value>, pagination: &Pagination) -> (Vec<Value>, Pagination) {
    let sort = if pagination.sort.trim().is_empty() {
        "id"
    } else {
        pagination.sort.trim()
    };

    docs.sort_by(|a, b| {
        let ord = compare_field(a, b, sort).then_with(|| compare_field(a, b, "id"));
        if pagination.sort_ascending {
            ord
        } else {
            ord.reverse()
        }
    });

    let total = docs.len() as i64;
    let page_size = i64::from(pagination.page_size);
    let page_number = i64::from(pagination.page_number.max(0));

    let total_pages = match (total, page_size) {
        (0, _) => 0,
        (_, size) if size <= 0 => 1,
        (total, size) => (total + size - 1) / size,
    };

    let page = if page_size <= 0 {
        docs
    } else {
        let start = page_number.saturating_mul(page_size);
        docs.into_iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .collect()
    };

    let filled = Pagination {
        page_number: pagination.page_number.max(0),
        sort: sort.to_string(),
        total_pages,
        total_records: total,
        ..pagination.clone()
    };

    (page, filled)
}

/// Counts documents in `collection` whose string `field` equals `value`.
pub fn count_documents_where(
    store: &dyn DocumentStore,
    collection: &str,
    field: &str,
    value: &str,
) -> CoreResult<usize> {
    Ok(store
        .list(collection)?
        .iter()
        .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
        .count())
}

/// Typed repository for one [`Record`] type.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn find_by_id(&self, id: &str) -> CoreResult<Option<T>> {
        self.store
            .get(T::COLLECTION, id)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub fn exists(&self, id: &str) -> CoreResult<bool> {
        Ok(self.store.get(T::COLLECTION, id)?.is_some())
    }

    pub fn insert(&self, record: &T) -> CoreResult<()> {
        let doc = serde_json::to_value(record)?;
        self.store.insert(T::COLLECTION, record.id(), &doc)
    }

    pub fn replace(&self, record: &T) -> CoreResult<()> {
        let doc = serde_json::to_value(record)?;
        self.store.replace(T::COLLECTION, record.id(), &doc)
    }

    pub fn delete(&self, id: &str) -> CoreResult<bool> {
        self.store.delete(T::COLLECTION, id)
    }

    /// Filters, sorts and pages the collection.
    pub fn find_all(&self, query: &ListQuery) -> CoreResult<Page<T>> {
        let docs: Vec<Value> = self
            .store
            .list(T::COLLECTION)?
            .into_iter()
            .filter(|doc| query.matches(doc))
            .collect();

        let (page, pagination) = paginate(docs, &query.pagination);
        let items = page
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(Page { items, pagination })
    }

    /// Every record for a patient, oldest first.
    pub fn find_by_patient(&self, patient_id: &str) -> CoreResult<Vec<T>> {
        self.find_where("patient_id", patient_id)
    }

    /// Every record whose string `field` equals `value`, oldest first.
    pub fn find_where(&self, field: &str, value: &str) -> CoreResult<Vec<T>> {
        let mut records = self
            .store
            .list(T::COLLECTION)?
            .into_iter()
            .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        records.sort_by(|a, b| {
            a.created_at()
                .cmp(b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(records)
    }

    pub fn count_where(&self, field: &str, value: &str) -> CoreResult<usize> {
        count_documents_where(self.store.as_ref(), T::COLLECTION, field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use api_shared::pb;
    use serde_json::json;

    fn repo() -> Repository<pb::Allergy> {
        Repository::new(Arc::new(MemoryDocumentStore::new()))
    }

    fn allergy(id: &str, patient: &str, allergen: &str) -> pb::Allergy {
        pb::Allergy {
            id: id.into(),
            patient_id: patient.into(),
            allergen: allergen.into(),
            ..Default::default()
        }
    }

    fn paging(page_number: i32, page_size: i32, sort: &str, ascending: bool) -> Pagination {
        Pagination {
            page_number,
            page_size,
            sort: sort.into(),
            sort_ascending: ascending,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_find_and_delete() {
        let repo = repo();
        let a = allergy("a1", "p1", "peanut");
        repo.insert(&a).expect("insert");
        assert!(repo.exists("a1").unwrap());
        assert_eq!(repo.find_by_id("a1").unwrap(), Some(a));
        assert!(repo.delete("a1").unwrap());
        assert_eq!(repo.find_by_id("a1").unwrap(), None);
    }

    #[test]
    fn test_find_all_filters_by_patient() {
        let repo = repo();
        repo.insert(&allergy("a1", "p1", "peanut")).unwrap();
        repo.insert(&allergy("a2", "p2", "latex")).unwrap();
        repo.insert(&allergy("a3", "p1", "pollen")).unwrap();

        let page = repo.find_all(&ListQuery::for_patient("p1")).unwrap();
        let ids: Vec<_> = page.items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a3", "a1"], "default sort is id, descending when not ascending");
        assert_eq!(page.pagination.total_records, 2);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_paging_splits_results() {
        let repo = repo();
        for i in 0..5 {
            repo.insert(&allergy(&format!("a{i}"), "p", "x")).unwrap();
        }
        let query = ListQuery {
            pagination: paging(1, 2, "id", true),
            ..Default::default()
        };
        let page = repo.find_all(&query).unwrap();
        let ids: Vec<_> = page.items.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["a2", "a3"]);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total_records, 5);

        let past_end = ListQuery {
            pagination: paging(9, 2, "id", true),
            ..Default::default()
        };
        assert!(repo.find_all(&past_end).unwrap().items.is_empty());
    }

    #[test]
    fn test_paginate_sorts_numbers_numerically_and_missing_first() {
        let docs = vec![
            json!({"id": "a", "n": 10}),
            json!({"id": "b", "n": 9}),
            json!({"id": "c"}),
        ];
        let (page, pagination) = paginate(docs, &paging(0, 0, "n", true));
        let ids: Vec<_> = page.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(pagination.total_pages, 1);
    }

    #[test]
    fn test_paginate_empty_has_zero_pages() {
        let (page, pagination) = paginate(Vec::new(), &paging(-3, 10, "", true));
        assert!(page.is_empty());
        assert_eq!(pagination.total_pages, 0);
        assert_eq!(pagination.page_number, 0);
        assert_eq!(pagination.sort, "id");
    }

    #[test]
    fn test_count_where_and_find_by_patient() {
        let repo = repo();
        let mut first = allergy("b", "p1", "x");
        first.created_at = "2024-01-01T00:00:00.000000Z".into();
        let mut second = allergy("a", "p1", "y");
        second.created_at = "2024-01-02T00:00:00.000000Z".into();
        repo.insert(&second).unwrap();
        repo.insert(&first).unwrap();

        assert_eq!(repo.count_where("patient_id", "p1").unwrap(), 2);
        assert_eq!(repo.count_where("patient_id", "p2").unwrap(), 0);

        let ids: Vec<_> = repo
            .find_by_patient("p1")
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"], "oldest first");
    }

    #[test]
    fn test_list_query_from_request_drops_blank_filters() {
        let query = ListQuery::from(ListReq {
            pagination: None,
            patient_id: "  ".into(),
            national_health_id: "NH1".into(),
        });
        assert_eq!(query.patient_id, None);
        assert_eq!(query.national_health_id.as_deref(), Some("NH1"));
    }
}
