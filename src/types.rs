use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct About {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub specializations: Vec<Specialization>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Specialization {
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Portfolio {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "items")]
    pub projects: Vec<Project>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "ProjectWire")]
pub struct Project {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub category: String,
}

/// Older portfolio payloads carry a single `image` instead of `images`.
#[derive(Deserialize)]
struct ProjectWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    category: String,
}

impl From<ProjectWire> for Project {
    fn from(wire: ProjectWire) -> Self {
        let mut images = wire.images;
        if images.is_empty() {
            if let Some(image) = wire.image.filter(|image| !image.trim().is_empty()) {
                images.push(image);
            }
        }
        Project {
            title: wire.title,
            description: wire.description,
            images,
            category: wire.category,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Services {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Service {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "buttonText")]
    pub button_text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Testimonials {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Testimonial {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Clients {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Client {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub website: String,
}

// ─────────────────────────────────────────────────────────────────
// Plain-text renderings
// ─────────────────────────────────────────────────────────────────

impl fmt::Display for About {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "[image] {}", self.image)?;
        writeln!(f)?;
        writeln!(f, "Our Story")?;
        writeln!(f, "{}", self.bio)?;
        if !self.specializations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Our Specializations")?;
            for specialization in &self.specializations {
                writeln!(f, "  * {}", specialization.title)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.description)?;
        if !self.projects.is_empty() {
            writeln!(f)?;
            writeln!(f, "Our Projects")?;
        }
        for project in &self.projects {
            writeln!(f, "  * {} [{}]", project.title, project.category)?;
            if !project.description.is_empty() {
                writeln!(f, "    {}", project.description)?;
            }
            for image in &project.images {
                writeln!(f, "    [image] {}", image)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for service in &self.services {
            writeln!(f)?;
            writeln!(f, "  * {}", service.title)?;
            writeln!(f, "    {}", service.description)?;
            if !service.image.is_empty() {
                writeln!(f, "    [image] {}", service.image)?;
            }
            if !service.button_text.is_empty() {
                writeln!(f, "    <{}>", service.button_text)?;
            }
        }
        Ok(())
    }
}

impl Testimonial {
    /// Five-slot star bar, e.g. `★★★★☆`.
    pub fn stars(&self) -> String {
        let rating = usize::from(self.rating.unwrap_or(0).min(5));
        format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating))
    }
}

impl fmt::Display for Testimonials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for testimonial in &self.testimonials {
            writeln!(f)?;
            writeln!(f, "  {}", testimonial.stars())?;
            writeln!(f, "  \"{}\"", testimonial.text)?;
            writeln!(
                f,
                "  - {}, {} at {}",
                testimonial.name, testimonial.title, testimonial.company
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Clients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(description) = &self.description {
            writeln!(f, "{}", description)?;
        }
        for client in &self.clients {
            writeln!(f)?;
            writeln!(f, "  * {}", client.name)?;
            writeln!(f, "    {}", client.description)?;
            if !client.website.is_empty() {
                writeln!(f, "    {}", client.website)?;
            }
        }
        Ok(())
    }
}
