//! Schema-driven editable draft of one resource document

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value as Json};

use crate::error::{Error, Result};
use crate::schema::{Blank, Field, FieldKind, Resource, Rule, Schema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

/// Field values of the top level or of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    values: BTreeMap<&'static str, Value>,
}

impl Record {
    fn blank(fields: &'static [Field]) -> Self {
        let values = fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::ImageList => Value::List(vec![String::new()]),
                    _ => Value::Text(String::new()),
                };
                (field.key, value)
            })
            .collect();
        Record { values }
    }

    fn from_json(fields: &'static [Field], object: Option<&Map<String, Json>>) -> Self {
        let mut record = Record::blank(fields);
        let Some(object) = object else {
            return record;
        };
        for field in fields {
            let value = match (field.kind, object.get(field.key)) {
                (FieldKind::ImageList, Some(Json::Array(items))) => {
                    let images: Vec<String> = items.iter().filter_map(scalar_text).collect();
                    if images.is_empty() {
                        continue;
                    }
                    Value::List(images)
                }
                (FieldKind::ImageList, _) => continue,
                (_, Some(json)) => Value::Text(scalar_text(json).unwrap_or_default()),
                (_, None) => continue,
            };
            record.values.insert(field.key, value);
        }
        record
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            Value::Text(text) => Some(text),
            Value::List(_) => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key)? {
            Value::List(items) => Some(items),
            Value::Text(_) => None,
        }
    }

    fn is_blank(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(Value::Text(text)) => text.trim().is_empty(),
            Some(Value::List(items)) => items.iter().all(|item| item.trim().is_empty()),
            None => true,
        }
    }

    fn is_valid(&self, field: &Field) -> bool {
        let blank = self.is_blank(field.key);
        if field.rule == Rule::Required && blank {
            return false;
        }
        match field.kind {
            FieldKind::Rating if !blank => self.text(field.key).and_then(parse_rating).is_some(),
            _ => true,
        }
    }

    fn text_mut(&mut self, field: &Field) -> Result<&mut String> {
        match self.values.get_mut(field.key) {
            Some(Value::Text(text)) => Ok(text),
            _ => Err(Error::validation(format!(
                "{} is not a single-value field",
                field.label
            ))),
        }
    }

    fn list_mut(&mut self, field: &Field) -> Result<&mut Vec<String>> {
        match self.values.get_mut(field.key) {
            Some(Value::List(items)) => Ok(items),
            _ => Err(Error::validation(format!("{} is not a list field", field.label))),
        }
    }

    fn to_wire(&self, fields: &'static [Field]) -> Map<String, Json> {
        let mut object = Map::new();
        for field in fields {
            let value = match self.values.get(field.key) {
                Some(Value::List(items)) => Some(Json::Array(
                    items
                        .iter()
                        .filter(|item| !item.trim().is_empty())
                        .cloned()
                        .map(Json::String)
                        .collect(),
                )),
                Some(Value::Text(text)) if field.kind == FieldKind::Rating => {
                    parse_rating(text).map(|rating| Json::Number(Number::from(rating)))
                }
                Some(Value::Text(text)) if text.trim().is_empty() => match field.when_blank {
                    Blank::Send => Some(Json::String(text.clone())),
                    Blank::Default(fallback) => Some(Json::String(fallback.to_string())),
                    Blank::Omit => None,
                },
                Some(Value::Text(text)) => Some(Json::String(text.clone())),
                None => None,
            };
            if let Some(value) = value {
                object.insert(field.key.to_string(), value);
            }
        }
        object
    }
}

/// Where an uploaded image URL should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget<'a> {
    Field { key: &'a str },
    Entry { index: usize, key: &'a str },
    EntrySlot { index: usize, key: &'a str, slot: usize },
}

/// In-progress edit of one resource, owned by an open form modal.
///
/// The entry list never drops below one row while editing; rows whose
/// filter fields are blank are discarded only when mapping to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    schema: &'static Schema,
    record: Record,
    entries: Vec<Record>,
}

impl Draft {
    pub fn blank(schema: &'static Schema) -> Self {
        Draft {
            schema,
            record: Record::blank(schema.fields),
            entries: vec![Record::blank(schema.entries.fields)],
        }
    }

    pub fn from_document<R: Resource>(document: &R) -> Result<Self> {
        let schema = R::SCHEMA;
        let json = serde_json::to_value(document)?;
        let object = json.as_object();
        let mut entries: Vec<Record> = object
            .and_then(|object| object.get(schema.entries.key))
            .and_then(Json::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| Record::from_json(schema.entries.fields, row.as_object()))
                    .collect()
            })
            .unwrap_or_default();
        if entries.is_empty() {
            entries.push(Record::blank(schema.entries.fields));
        }
        Ok(Draft {
            schema,
            record: Record::from_json(schema.fields, object),
            entries,
        })
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.record.text(key)
    }

    pub fn entries(&self) -> &[Record] {
        &self.entries
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let field = self.top_field(key)?;
        *self.record.text_mut(field)? = value.into();
        Ok(())
    }

    pub fn set_entry_field(&mut self, index: usize, key: &str, value: impl Into<String>) -> Result<()> {
        let field = self.entry_field(key)?;
        *self.entry_mut(index)?.text_mut(field)? = value.into();
        Ok(())
    }

    pub fn set_entry_image(
        &mut self,
        index: usize,
        key: &str,
        slot: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let field = self.entry_field(key)?;
        let images = self.entry_mut(index)?.list_mut(field)?;
        let image = images.get_mut(slot).ok_or_else(|| {
            Error::validation(format!("{} has no image slot {}", field.label, slot))
        })?;
        *image = value.into();
        Ok(())
    }

    /// Appends a blank entry and returns its index.
    pub fn push_entry(&mut self) -> usize {
        self.entries.push(Record::blank(self.schema.entries.fields));
        self.entries.len() - 1
    }

    /// Removes an entry unless it is the last one left.
    pub fn remove_entry(&mut self, index: usize) -> bool {
        if self.entries.len() <= 1 || index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        true
    }

    pub fn push_entry_image(&mut self, index: usize, key: &str) -> Result<usize> {
        let field = self.entry_field(key)?;
        let images = self.entry_mut(index)?.list_mut(field)?;
        images.push(String::new());
        Ok(images.len() - 1)
    }

    /// Removes an image slot unless it is the last one in its list.
    pub fn remove_entry_image(&mut self, index: usize, key: &str, slot: usize) -> Result<bool> {
        let field = self.entry_field(key)?;
        let images = self.entry_mut(index)?.list_mut(field)?;
        if images.len() <= 1 || slot >= images.len() {
            return Ok(false);
        }
        images.remove(slot);
        Ok(true)
    }

    /// Checks that `target` names an existing image field, entry and slot.
    pub fn check_image_target(&self, target: ImageTarget<'_>) -> Result<()> {
        let field = match target {
            ImageTarget::Field { key } => self.top_field(key)?,
            ImageTarget::Entry { key, .. } | ImageTarget::EntrySlot { key, .. } => {
                self.entry_field(key)?
            }
        };
        let label = self.schema.entries.label;
        let entry = |index: usize| {
            self.entries
                .get(index)
                .ok_or_else(|| Error::validation(format!("{} {} does not exist", label, index + 1)))
        };
        match (target, field.kind) {
            (ImageTarget::Field { .. }, FieldKind::Image) => Ok(()),
            (ImageTarget::Entry { index, .. }, FieldKind::Image) => entry(index).map(|_| ()),
            (ImageTarget::EntrySlot { index, key, slot }, FieldKind::ImageList) => {
                let slots = entry(index)?.list(key).map_or(0, <[String]>::len);
                if slot < slots {
                    Ok(())
                } else {
                    Err(Error::validation(format!(
                        "{} has no image slot {}",
                        field.label, slot
                    )))
                }
            }
            _ => Err(Error::validation(format!(
                "{} does not hold an image",
                field.label
            ))),
        }
    }

    pub fn write_image(&mut self, target: ImageTarget<'_>, url: impl Into<String>) -> Result<()> {
        self.check_image_target(target)?;
        match target {
            ImageTarget::Field { key } => self.set_field(key, url),
            ImageTarget::Entry { index, key } => self.set_entry_field(index, key, url),
            ImageTarget::EntrySlot { index, key, slot } => {
                self.set_entry_image(index, key, slot, url)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let top_ok = self.schema.fields.iter().all(|field| self.record.is_valid(field));
        let entries_ok = self.entries.iter().all(|entry| {
            self.schema
                .entries
                .fields
                .iter()
                .all(|field| entry.is_valid(field))
        });
        if top_ok && entries_ok {
            Ok(())
        } else {
            Err(Error::validation(self.schema.required_message))
        }
    }

    /// Wire body with blank entries dropped. Does not validate.
    pub fn to_wire(&self) -> Json {
        let mut object = self.record.to_wire(self.schema.fields);
        let entry_fields = self.schema.entries.fields;
        let rows = self
            .entries
            .iter()
            .filter(|entry| {
                entry_fields
                    .iter()
                    .filter(|field| field.filters_entry())
                    .all(|field| !entry.is_blank(field.key))
            })
            .map(|entry| Json::Object(entry.to_wire(entry_fields)))
            .collect();
        object.insert(self.schema.entries.key.to_string(), Json::Array(rows));
        Json::Object(object)
    }

    /// Validates, filters and decodes the draft into the document to send.
    pub fn into_document<R: Resource>(&self) -> Result<R> {
        if R::SCHEMA.path != self.schema.path {
            return Err(Error::validation(format!(
                "{} draft cannot be submitted as {}",
                self.schema.name,
                R::SCHEMA.name
            )));
        }
        self.validate()?;
        Ok(serde_json::from_value(self.to_wire())?)
    }

    fn top_field(&self, key: &str) -> Result<&'static Field> {
        self.schema.field(key).ok_or_else(|| {
            Error::validation(format!("{} has no field \"{}\"", self.schema.name, key))
        })
    }

    fn entry_field(&self, key: &str) -> Result<&'static Field> {
        self.schema.entry_field(key).ok_or_else(|| {
            Error::validation(format!(
                "{} has no field \"{}\"",
                self.schema.entries.label, key
            ))
        })
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut Record> {
        let label = self.schema.entries.label;
        self.entries
            .get_mut(index)
            .ok_or_else(|| Error::validation(format!("{} {} does not exist", label, index + 1)))
    }
}

fn scalar_text(json: &Json) -> Option<String> {
    match json {
        Json::String(text) => Some(text.clone()),
        Json::Number(number) => Some(number.to_string()),
        Json::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn parse_rating(text: &str) -> Option<u8> {
    text.trim()
        .parse::<u8>()
        .ok()
        .filter(|rating| (1..=5).contains(rating))
}
