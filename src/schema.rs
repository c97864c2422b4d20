//! Declarative definitions of the five singleton resources
//!
//! Every resource is described by a [`Schema`]: its endpoint, its top-level
//! fields, and the shape of its repeatable entries. Drafts, validation and
//! the wire mapping are all driven from this table, so adding a resource
//! means adding a document type and one schema constant.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::types::{About, Clients, Portfolio, Services, Testimonials};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Single image URL, a valid upload target.
    Image,
    /// List of image URLs; blank slots are dropped on submit.
    ImageList,
    /// Integer rating in `1..=5`, sent as a JSON number.
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Optional,
    /// Must be non-blank to submit. Entries where it is blank are dropped.
    Required,
    /// Entries where it is blank are dropped, but a blank value does not block submit.
    Keyed,
}

/// What goes on the wire for a blank optional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blank {
    Send,
    Default(&'static str),
    Omit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rule: Rule,
    pub when_blank: Blank,
}

impl Field {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Field {
            key,
            label,
            kind: FieldKind::Text,
            rule: Rule::Optional,
            when_blank: Blank::Send,
        }
    }

    pub const fn image(key: &'static str, label: &'static str) -> Self {
        Field {
            kind: FieldKind::Image,
            ..Field::text(key, label)
        }
    }

    pub const fn image_list(key: &'static str, label: &'static str) -> Self {
        Field {
            kind: FieldKind::ImageList,
            ..Field::text(key, label)
        }
    }

    pub const fn rating(key: &'static str, label: &'static str) -> Self {
        Field {
            kind: FieldKind::Rating,
            ..Field::text(key, label)
        }
    }

    pub const fn required(self) -> Self {
        Field {
            rule: Rule::Required,
            ..self
        }
    }

    pub const fn keyed(self) -> Self {
        Field {
            rule: Rule::Keyed,
            ..self
        }
    }

    pub const fn default_to(self, value: &'static str) -> Self {
        Field {
            when_blank: Blank::Default(value),
            ..self
        }
    }

    pub const fn omit_when_blank(self) -> Self {
        Field {
            when_blank: Blank::Omit,
            ..self
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, FieldKind::Image | FieldKind::ImageList)
    }

    /// Whether a blank value drops the entry it belongs to.
    pub fn filters_entry(&self) -> bool {
        matches!(self.rule, Rule::Required | Rule::Keyed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySchema {
    pub key: &'static str,
    pub label: &'static str,
    pub fields: &'static [Field],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Display name, e.g. `About`.
    pub name: &'static str,
    /// Lower-case noun used in notices, e.g. `about`.
    pub noun: &'static str,
    /// Name and noun used by the delete notices.
    pub deleted: (&'static str, &'static str),
    pub path: &'static str,
    pub fields: &'static [Field],
    pub entries: EntrySchema,
    /// Consolidated message shown when validation fails.
    pub required_message: &'static str,
}

impl Schema {
    pub fn field(&self, key: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn entry_field(&self, key: &str) -> Option<&'static Field> {
        self.entries.fields.iter().find(|field| field.key == key)
    }
}

/// A singleton document managed by one screen.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + fmt::Debug + fmt::Display + 'static
{
    const SCHEMA: &'static Schema;
}

pub const ABOUT: Schema = Schema {
    name: "About",
    noun: "about",
    deleted: ("About section", "about section"),
    path: "/api/about",
    fields: &[
        Field::text("title", "Title").required(),
        Field::text("bio", "Bio").required(),
        Field::image("image", "Image").required(),
    ],
    entries: EntrySchema {
        key: "specializations",
        label: "Specialization",
        fields: &[Field::text("title", "Title").keyed()],
    },
    required_message: "Please fill in all required fields (title, bio, image).",
};

pub const PORTFOLIO: Schema = Schema {
    name: "Portfolio",
    noun: "portfolio",
    deleted: ("Portfolio", "portfolio"),
    path: "/api/portfolio",
    fields: &[
        Field::text("title", "Title").required(),
        Field::text("description", "Description").required(),
    ],
    entries: EntrySchema {
        key: "projects",
        label: "Project",
        fields: &[
            Field::text("title", "Project Title").required(),
            Field::text("description", "Project Description"),
            Field::image_list("images", "Images"),
            Field::text("category", "Category").required(),
        ],
    },
    required_message:
        "Please fill in all required fields (title, description, project titles, and categories).",
};

pub const SERVICES: Schema = Schema {
    name: "Services",
    noun: "services",
    deleted: ("Services", "services"),
    path: "/api/services",
    fields: &[Field::text("title", "Title").required()],
    entries: EntrySchema {
        key: "services",
        label: "Service",
        fields: &[
            Field::text("title", "Service Title").required(),
            Field::text("description", "Service Description").required(),
            Field::image("image", "Image").default_to(""),
            Field::text("buttonText", "Button Text").default_to("Learn More"),
        ],
    },
    required_message: "Please fill in all required fields (title, service titles, and descriptions).",
};

pub const TESTIMONIALS: Schema = Schema {
    name: "Testimonials",
    noun: "testimonials",
    deleted: ("Testimonials", "testimonials"),
    path: "/api/testimonials",
    fields: &[Field::text("title", "Title").required()],
    entries: EntrySchema {
        key: "testimonials",
        label: "Testimonial",
        fields: &[
            Field::text("name", "Name").required(),
            Field::text("text", "Text").required(),
            Field::text("title", "Job Title").required(),
            Field::text("company", "Company").required(),
            Field::image("image", "Photo").default_to(""),
            Field::rating("rating", "Rating").required(),
        ],
    },
    required_message:
        "Please fill in all required fields (title, name, text, job title, company, rating 1-5).",
};

pub const CLIENTS: Schema = Schema {
    name: "Clients",
    noun: "clients",
    deleted: ("Clients", "clients"),
    path: "/api/clients",
    fields: &[
        Field::text("title", "Title").required(),
        Field::text("description", "Description").omit_when_blank(),
    ],
    entries: EntrySchema {
        key: "clients",
        label: "Client",
        fields: &[
            Field::text("name", "Client Name").required(),
            Field::text("description", "Client Description").required(),
            Field::image("logo", "Logo").default_to(""),
            Field::text("website", "Website").default_to(""),
        ],
    },
    required_message: "Please fill in all required fields (title, client name, and description).",
};

impl Resource for About {
    const SCHEMA: &'static Schema = &ABOUT;
}

impl Resource for Portfolio {
    const SCHEMA: &'static Schema = &PORTFOLIO;
}

impl Resource for Services {
    const SCHEMA: &'static Schema = &SERVICES;
}

impl Resource for Testimonials {
    const SCHEMA: &'static Schema = &TESTIMONIALS;
}

impl Resource for Clients {
    const SCHEMA: &'static Schema = &CLIENTS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_distinct() {
        let paths = [
            ABOUT.path,
            PORTFOLIO.path,
            SERVICES.path,
            TESTIMONIALS.path,
            CLIENTS.path,
        ];
        for (i, path) in paths.iter().enumerate() {
            assert!(path.starts_with("/api/"));
            assert!(!paths[i + 1..].contains(path));
        }
    }

    #[test]
    fn test_field_lookup() {
        assert_eq!(ABOUT.field("image").unwrap().kind, FieldKind::Image);
        assert!(ABOUT.field("specializations").is_none());
        assert_eq!(
            TESTIMONIALS.entry_field("rating").unwrap().kind,
            FieldKind::Rating
        );
        assert_eq!(
            SERVICES.entry_field("buttonText").unwrap().when_blank,
            Blank::Default("Learn More")
        );
    }

    #[test]
    fn test_about_delete_notices_name_the_section() {
        assert_eq!(ABOUT.deleted, ("About section", "about section"));
        assert_eq!(CLIENTS.deleted, (CLIENTS.name, CLIENTS.noun));
        assert_ne!(ABOUT, PORTFOLIO);
    }

    #[test]
    fn test_every_entry_schema_can_filter() {
        for schema in [&ABOUT, &PORTFOLIO, &SERVICES, &TESTIMONIALS, &CLIENTS] {
            assert!(
                schema.entries.fields.iter().any(Field::filters_entry),
                "{} entries have no filter field",
                schema.name
            );
        }
    }
}
