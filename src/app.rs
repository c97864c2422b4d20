//! Tab shell composing the five resource screens

use std::fmt;

use crate::core::{data::ResourceClient, settings::Settings};
use crate::screen::{Notice, ResourceScreen};
use crate::types::{About, Clients, Portfolio, Services, Testimonials};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    About,
    Portfolio,
    Services,
    Testimonials,
    Clients,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::About,
        Tab::Portfolio,
        Tab::Services,
        Tab::Testimonials,
        Tab::Clients,
    ];

    fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tab::About => "About",
            Tab::Portfolio => "Portfolio",
            Tab::Services => "Services",
            Tab::Testimonials => "Testimonials",
            Tab::Clients => "Clients",
        };
        f.write_str(label)
    }
}

/// The app: one screen per tab, each owning its own document and draft.
pub struct Studio {
    pub about: ResourceScreen<About>,
    pub portfolio: ResourceScreen<Portfolio>,
    pub services: ResourceScreen<Services>,
    pub testimonials: ResourceScreen<Testimonials>,
    pub clients: ResourceScreen<Clients>,
    active: Tab,
}

impl Studio {
    pub fn new(settings: &Settings) -> Self {
        Studio {
            about: ResourceScreen::new(ResourceClient::new(settings)),
            portfolio: ResourceScreen::new(ResourceClient::new(settings)),
            services: ResourceScreen::new(ResourceClient::new(settings)),
            testimonials: ResourceScreen::new(ResourceClient::new(settings)),
            clients: ResourceScreen::new(ResourceClient::new(settings)),
            active: Tab::About,
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) {
        tracing::debug!("Switching to {} tab", tab);
        self.active = tab;
    }

    pub fn next(&mut self) {
        self.select(self.active.next());
    }

    pub fn previous(&mut self) {
        self.select(self.active.previous());
    }

    /// Mounts every screen, one after another.
    pub async fn mount_all(&mut self) {
        self.about.mount().await;
        self.portfolio.mount().await;
        self.services.mount().await;
        self.testimonials.mount().await;
        self.clients.mount().await;
    }

    pub fn render(&self, tab: Tab) -> String {
        match tab {
            Tab::About => self.about.render(),
            Tab::Portfolio => self.portfolio.render(),
            Tab::Services => self.services.render(),
            Tab::Testimonials => self.testimonials.render(),
            Tab::Clients => self.clients.render(),
        }
    }

    /// Drains the pending notices of one tab, oldest first.
    pub fn take_notices(&mut self, tab: Tab) -> Vec<Notice> {
        fn drain<R: crate::schema::Resource>(screen: &mut ResourceScreen<R>) -> Vec<Notice> {
            std::iter::from_fn(|| screen.take_notice()).collect()
        }
        match tab {
            Tab::About => drain(&mut self.about),
            Tab::Portfolio => drain(&mut self.portfolio),
            Tab::Services => drain(&mut self.services),
            Tab::Testimonials => drain(&mut self.testimonials),
            Tab::Clients => drain(&mut self.clients),
        }
    }

    /// Tab bar plus the active screen.
    pub fn render_active(&self) -> String {
        let bar: Vec<String> = Tab::ALL
            .iter()
            .map(|tab| {
                if *tab == self.active {
                    format!("[{}]", tab)
                } else {
                    format!(" {} ", tab)
                }
            })
            .collect();
        format!("{}\n\n{}", bar.join(" "), self.render(self.active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::About.next(), Tab::Portfolio);
        assert_eq!(Tab::Clients.next(), Tab::About);
        assert_eq!(Tab::About.previous(), Tab::Clients);
        assert_eq!(Tab::Testimonials.to_string(), "Testimonials");
    }

    #[actix_web::test]
    async fn test_studio_navigation() {
        let mut studio = Studio::new(&Settings::new());
        assert_eq!(studio.active(), Tab::About);
        studio.next();
        studio.next();
        assert_eq!(studio.active(), Tab::Services);
        studio.previous();
        assert_eq!(studio.active(), Tab::Portfolio);

        let rendered = studio.render_active();
        assert!(rendered.contains("[Portfolio]"));
        assert!(rendered.contains("Loading Portfolio..."));
    }
}
