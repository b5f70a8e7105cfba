use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Known `data-qa` labels on a zonaprop listing card. Labels outside the
/// closed set are carried through under their raw name so no field is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLabel {
    Price,
    Expenses,
    Location,
    Description,
    Other(String),
}

impl FieldLabel {
    pub fn from_raw(label: &str) -> Self {
        match label {
            "POSTING_CARD_PRICE" => FieldLabel::Price,
            "expensas" => FieldLabel::Expenses,
            "POSTING_CARD_LOCATION" => FieldLabel::Location,
            "POSTING_CARD_DESCRIPTION" => FieldLabel::Description,
            other => FieldLabel::Other(other.to_string()),
        }
    }
}

/// Currency token printed next to an amount on a listing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Ars,
    /// Bare `$` sign with no ISO code next to it.
    Sign,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Ars => "ARS",
            Currency::Sign => "$",
        }
    }
}

/// Amount half of a parsed price. `Raw` keeps the original text when no
/// numeric token was found, so a degraded parse cannot pass as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    Parsed(i64),
    Raw(String),
}

impl Amount {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Amount::Parsed(_))
    }

    /// Output-cell form: the number, or the untouched original text.
    pub fn to_field(&self) -> String {
        match self {
            Amount::Parsed(value) => value.to_string(),
            Amount::Raw(text) => text.clone(),
        }
    }
}

/// A price or fee as it appears on a card: amount plus currency token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyValue {
    pub amount: Amount,
    pub currency: Option<Currency>,
}

/// Physical features advertised in a card's feature blurb, keyed by the
/// canonical output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Feature {
    Area,
    Rooms,
    Bedrooms,
    Bathrooms,
    Parking,
}

impl Feature {
    pub fn column(self) -> &'static str {
        match self {
            Feature::Area => "square_meters_area",
            Feature::Rooms => "rooms",
            Feature::Bedrooms => "bedrooms",
            Feature::Bathrooms => "bathrooms",
            Feature::Parking => "parking",
        }
    }
}

/// One flat record per listing block. Built once by the extractor and never
/// mutated afterwards; the output sink decides the column layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub url: Option<String>,
    pub price: Option<CurrencyValue>,
    pub expenses: Option<CurrencyValue>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub features: BTreeMap<Feature, String>,
    /// `data-qa` fields outside the known label set, verbatim.
    pub extra: Vec<(String, String)>,
}

impl Listing {
    /// Flattens the record to `(column, value)` pairs. A price always splits
    /// into a `_value`/`_type` pair, never a single ambiguous column.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(url) = &self.url {
            fields.push(("url".to_string(), url.clone()));
        }
        push_currency(&mut fields, "price", self.price.as_ref());
        push_currency(&mut fields, "expenses", self.expenses.as_ref());
        if let Some(location) = &self.location {
            fields.push(("location".to_string(), location.clone()));
        }
        if let Some(description) = &self.description {
            fields.push(("description".to_string(), description.clone()));
        }
        if let Some(address) = &self.address {
            fields.push(("address".to_string(), address.clone()));
        }
        for (feature, value) in &self.features {
            fields.push((feature.column().to_string(), value.clone()));
        }
        if let Some(phone) = &self.phone {
            fields.push(("phone".to_string(), phone.clone()));
        }
        for (label, value) in &self.extra {
            fields.push((label.clone(), value.clone()));
        }
        fields
    }
}

fn push_currency(fields: &mut Vec<(String, String)>, name: &str, value: Option<&CurrencyValue>) {
    if let Some(value) = value {
        fields.push((format!("{}_value", name), value.amount.to_field()));
        let currency = value.currency.map(|c| c.as_str().to_string()).unwrap_or_default();
        fields.push((format!("{}_type", name), currency));
    }
}

// Serialize the flat record shape rather than the struct layout, so JSON
// output carries the same columns as the CSV sink.
impl Serialize for Listing {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = self.to_fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
