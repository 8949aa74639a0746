//! Structured search filters.
//!
//! Every field is optional; `None` means unconstrained. Filters are the
//! join point between user-driven edits and criteria the backend infers
//! from natural language, merged last-writer-wins.

use serde::{Deserialize, Serialize};

/// Buy-versus-rent selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Buy,
    Rent,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "buy"),
            TransactionType::Rent => write!(f, "rent"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(TransactionType::Buy),
            "rent" => Ok(TransactionType::Rent),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}

/// Structured query criteria. Absence means "unconstrained".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub price_min: Option<u64>,
    pub price_max: Option<u64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub search: Option<String>,
}

impl Filters {
    /// Merge backend-inferred criteria into this set.
    ///
    /// Only defined fields of `inferred` overwrite; `None` fields leave the
    /// existing values untouched. Empty strings are treated as absent.
    pub fn merge(&mut self, inferred: Filters) {
        if inferred.price_min.is_some() {
            self.price_min = inferred.price_min;
        }
        if inferred.price_max.is_some() {
            self.price_max = inferred.price_max;
        }
        if inferred.bedrooms.is_some() {
            self.bedrooms = inferred.bedrooms;
        }
        if inferred.bathrooms.is_some() {
            self.bathrooms = inferred.bathrooms;
        }
        if let Some(location) = non_empty(inferred.location) {
            self.location = Some(location);
        }
        if let Some(property_type) = non_empty(inferred.property_type) {
            self.property_type = Some(property_type);
        }
        if inferred.transaction_type.is_some() {
            self.transaction_type = inferred.transaction_type;
        }
        if let Some(search) = non_empty(inferred.search) {
            self.search = Some(search);
        }
    }

    /// Reset to no constraints.
    pub fn clear(&mut self) {
        *self = Filters::default();
    }

    /// Number of defined, non-empty constraints. Drives UI badges and
    /// gates "Apply" actions.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        count += usize::from(self.price_min.is_some());
        count += usize::from(self.price_max.is_some());
        count += usize::from(self.bedrooms.is_some());
        count += usize::from(self.bathrooms.is_some());
        count += usize::from(matches!(&self.location, Some(s) if !s.is_empty()));
        count += usize::from(matches!(&self.property_type, Some(s) if !s.is_empty()));
        count += usize::from(self.transaction_type.is_some());
        count += usize::from(matches!(&self.search, Some(s) if !s.is_empty()));
        count
    }

    /// Whether no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
