//! Structured search predicate.
//!
//! A predicate is a flat list of `{field, operator, value}` clauses joined with
//! AND. There is no OR, NOT or grouping. Backends render it into their own query
//! language; values never get spliced into query text unescaped.

use super::request::SearchRequest;

/// Searchable attributes of a spawn rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Canonical (lower-cased, truncated) species name
    Name,
    /// Tag set, e.g. `type_grass`
    Features,
    /// Rarity bucket
    Bucket,
    /// `species.generation`
    Generation,
}

impl Field {
    /// Column in the relational table.
    pub fn column(&self) -> &'static str {
        match self {
            Field::Name => "pokemon_name",
            Field::Features => "features",
            Field::Bucket => "bucket",
            Field::Generation => "generation",
        }
    }

    /// Attribute path in the raw document, as the search engine indexes it.
    pub fn document_path(&self) -> &'static str {
        match self {
            Field::Name => "species.name",
            Field::Features => "features",
            Field::Bucket => "bucket",
            Field::Generation => "species.generation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Case-insensitive substring match
    Contains,
    /// Set membership of a single element
    Has,
    /// Exact equality
    Eq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: Field,
    pub op: Op,
    pub value: FilterValue,
}

impl Clause {
    pub fn name_contains(text: impl Into<String>) -> Self {
        Self {
            field: Field::Name,
            op: Op::Contains,
            value: FilterValue::Text(text.into()),
        }
    }

    pub fn has_feature(tag: impl Into<String>) -> Self {
        Self {
            field: Field::Features,
            op: Op::Has,
            value: FilterValue::Text(tag.into()),
        }
    }

    pub fn bucket_eq(bucket: impl Into<String>) -> Self {
        Self {
            field: Field::Bucket,
            op: Op::Eq,
            value: FilterValue::Text(bucket.into()),
        }
    }

    pub fn generation_eq(generation: i32) -> Self {
        Self {
            field: Field::Generation,
            op: Op::Eq,
            value: FilterValue::Int(generation),
        }
    }

    /// Free-text clauses are sent as the engine's query string, not as a filter.
    pub fn is_text(&self) -> bool {
        self.field == Field::Name && self.op == Op::Contains
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn match_all() -> Self {
        Self::default()
    }

    /// One clause per supplied filter; absent filters contribute nothing.
    pub fn from_request(request: &SearchRequest) -> Self {
        let mut predicate = Self::match_all();
        if let Some(text) = request.text() {
            predicate = predicate.and(Clause::name_contains(text));
        }
        if let Some(tag) = &request.feature {
            predicate = predicate.and(Clause::has_feature(tag.as_str()));
        }
        if let Some(bucket) = &request.bucket {
            predicate = predicate.and(Clause::bucket_eq(bucket.as_str()));
        }
        if let Some(generation) = request.generation {
            predicate = predicate.and(Clause::generation_eq(generation));
        }
        predicate
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The free-text part of the predicate, if any.
    pub fn text(&self) -> Option<&str> {
        self.clauses
            .iter()
            .find(|c| c.is_text())
            .and_then(|c| match &c.value {
                FilterValue::Text(t) => Some(t.as_str()),
                FilterValue::Int(_) => None,
            })
    }

    /// Clauses other than the free text.
    pub fn filters(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| !c.is_text())
    }
}
