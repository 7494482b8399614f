use async_trait::async_trait;
use serde_json::Value;
use spawndex::{
    config::BackendKind,
    db::{ResultOrdering, SpawnStore, StoreResult},
    search::{Clause, Field, FilterValue, Op, Predicate},
    Error, Result,
};
use spawndex_models::{IndexedFields, SpawnDocument};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

/// Evaluates predicates the way the relational store does, over a `Vec`.
pub struct MemoryStore {
    rows: Vec<(IndexedFields, Value)>,
    calls: AtomicUsize,
    last_limit: Mutex<Option<u32>>,
}

impl MemoryStore {
    pub fn new(documents: Vec<Value>) -> Self {
        let rows = documents
            .into_iter()
            .map(|value| {
                let doc = SpawnDocument::from_value(value).expect("fixture is a valid document");
                let fields = doc.indexed_fields().expect("fixture has indexed fields");
                (fields, doc.into_value())
            })
            .collect();
        Self {
            rows,
            calls: AtomicUsize::new(0),
            last_limit: Mutex::new(None),
        }
    }

    /// Number of `filtered_search` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn last_limit(&self) -> Option<u32> {
        *self.last_limit.lock().unwrap()
    }
}

fn matches(fields: &IndexedFields, clause: &Clause) -> bool {
    match (clause.field, clause.op, &clause.value) {
        (Field::Name, Op::Contains, FilterValue::Text(text)) => fields
            .canonical_name
            .contains(&text.to_lowercase()),
        (Field::Features, Op::Has, FilterValue::Text(tag)) => fields.features.contains(tag),
        (Field::Bucket, Op::Eq, FilterValue::Text(bucket)) => {
            fields.bucket.as_deref() == Some(bucket.as_str())
        }
        (Field::Generation, Op::Eq, FilterValue::Int(generation)) => {
            fields.generation == Some(*generation)
        }
        other => panic!("unsupported clause in test store: {other:?}"),
    }
}

fn level_then_name(a: &IndexedFields, b: &IndexedFields) -> Ordering {
    // level_min DESC NULLS LAST
    let by_level = match (a.level_min, b.level_min) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_level
        .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl SpawnStore for MemoryStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Postgres
    }

    fn default_ordering(&self) -> ResultOrdering {
        ResultOrdering::LevelThenName
    }

    async fn filtered_search(&self, predicate: &Predicate, limit: u32) -> Result<StoreResult> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        *self.last_limit.lock().unwrap() = Some(limit);

        let mut matched: Vec<&(IndexedFields, Value)> = self
            .rows
            .iter()
            .filter(|(fields, _)| predicate.clauses().iter().all(|c| matches(fields, c)))
            .collect();
        matched.sort_by(|(a, _), (b, _)| level_then_name(a, b));

        Ok(StoreResult {
            hits: matched
                .into_iter()
                .take(limit as usize)
                .map(|(_, doc)| doc.clone())
                .collect(),
            processing_time_ms: None,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// A store whose every query fails with `message`.
pub struct FailingStore {
    pub message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl SpawnStore for FailingStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Postgres
    }

    fn default_ordering(&self) -> ResultOrdering {
        ResultOrdering::LevelThenName
    }

    async fn filtered_search(&self, _predicate: &Predicate, _limit: u32) -> Result<StoreResult> {
        Err(Error::SearchBackend(self.message.clone()))
    }

    async fn ping(&self) -> Result<()> {
        Err(Error::SearchBackend(self.message.clone()))
    }
}
