//! One tab's worth of state: fetch, display, and mutate a singleton resource
//!
//! ```text
//! Loading ──get──▶ Loaded ──delete──▶ Empty
//!    │               ▲  │                │
//!    └──404/error──▶ Empty ◀─refresh─────┘
//! ```
//!
//! Every async operation takes `&mut self`, so a screen never has two
//! requests in flight. The `busy` flag mirrors that for rendering.

use std::collections::VecDeque;
use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::core::data::ResourceClient;
use crate::draft::ImageTarget;
use crate::error::Error;
use crate::modal::{FormModal, ModalMode};
use crate::schema::Resource;
use crate::upload::{ImageUploader, MediaLibrary};

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<R> {
    Loading,
    Empty,
    Loaded(R),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the user, the equivalent of an alert dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

pub struct ResourceScreen<R: Resource> {
    client: ResourceClient<R>,
    state: ScreenState<R>,
    refreshing: bool,
    busy: bool,
    modal: Option<FormModal<R>>,
    notices: VecDeque<Notice>,
    last_refreshed: Option<DateTime<Local>>,
}

impl<R: Resource> ResourceScreen<R> {
    pub fn new(client: ResourceClient<R>) -> Self {
        ResourceScreen {
            client,
            state: ScreenState::Loading,
            refreshing: false,
            busy: false,
            modal: None,
            notices: VecDeque::new(),
            last_refreshed: None,
        }
    }

    pub fn name(&self) -> &'static str {
        R::SCHEMA.name
    }

    pub fn state(&self) -> &ScreenState<R> {
        &self.state
    }

    pub fn document(&self) -> Option<&R> {
        match &self.state {
            ScreenState::Loaded(document) => Some(document),
            _ => None,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn modal(&self) -> Option<&FormModal<R>> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut FormModal<R>> {
        self.modal.as_mut()
    }

    /// Whether the modal's submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.busy
            && self
                .modal
                .as_ref()
                .is_some_and(|modal| modal.mode() != ModalMode::Delete && !modal.is_uploading())
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    /// Initial fetch: shows the blocking loading state.
    pub async fn mount(&mut self) {
        self.state = ScreenState::Loading;
        self.fetch().await;
    }

    /// Re-fetch while keeping the current content on screen.
    pub async fn refresh(&mut self) {
        if self.busy {
            return;
        }
        self.refreshing = true;
        self.fetch().await;
        self.refreshing = false;
    }

    async fn fetch(&mut self) {
        self.busy = true;
        let result = self.client.get().await;
        self.busy = false;
        self.last_refreshed = Some(Local::now());

        self.state = match result {
            Ok(Some(document)) => {
                tracing::debug!("{} loaded", R::SCHEMA.name);
                ScreenState::Loaded(document)
            }
            Ok(None) => {
                tracing::debug!("{} is empty", R::SCHEMA.name);
                ScreenState::Empty
            }
            Err(error) => {
                tracing::warn!("Error fetching {} data: {}", R::SCHEMA.noun, error);
                self.notices.push_back(Notice::error(
                    "Error",
                    format!("Failed to load {} data: {}", R::SCHEMA.noun, error),
                ));
                ScreenState::Empty
            }
        };
    }

    /// Opens the modal. Edit and delete need a loaded document.
    pub fn open_modal(&mut self, mode: ModalMode) -> bool {
        let modal = match (mode, &self.state) {
            (ModalMode::Create, _) => FormModal::create(),
            (ModalMode::Edit, ScreenState::Loaded(document)) => match FormModal::edit(document) {
                Ok(modal) => modal,
                Err(error) => {
                    self.notices.push_back(Notice::error("Error", error.to_string()));
                    return false;
                }
            },
            (ModalMode::Delete, ScreenState::Loaded(_)) => FormModal::delete(),
            _ => return false,
        };
        tracing::debug!("Opening {} modal in {:?} mode", R::SCHEMA.name, mode);
        self.modal = Some(modal);
        true
    }

    pub fn cancel_modal(&mut self) {
        self.modal = None;
    }

    /// Submits the open create/edit modal.
    ///
    /// On success the response document is shown and the modal closes.
    /// On failure the modal stays open with its draft intact.
    pub async fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        let Some(modal) = self.modal.as_ref() else {
            return false;
        };
        let mode = modal.mode();

        self.busy = true;
        let result = modal.submit(&self.client).await;
        self.busy = false;

        match result {
            Ok(document) => {
                tracing::info!("{} {}", R::SCHEMA.name, mode.done());
                self.modal = None;
                self.state = ScreenState::Loaded(document);
                self.notices.push_back(Notice::success(format!(
                    "{} {} successfully",
                    R::SCHEMA.name,
                    mode.done()
                )));
                true
            }
            Err(Error::Validation(message)) => {
                tracing::debug!("{} draft rejected: {}", R::SCHEMA.name, message);
                self.notices.push_back(Notice::error("Error", message));
                false
            }
            Err(error) => {
                tracing::error!("{} {} failed: {}", R::SCHEMA.name, mode.verb(), error);
                self.notices.push_back(Notice::error(
                    "Error",
                    format!("Failed to {} {}: {}", mode.verb(), R::SCHEMA.noun, error),
                ));
                false
            }
        }
    }

    /// Deletes the document after the delete modal was confirmed.
    pub async fn confirm_delete(&mut self) -> bool {
        let confirmed = self
            .modal
            .as_ref()
            .is_some_and(|modal| modal.mode() == ModalMode::Delete);
        if self.busy || !confirmed {
            return false;
        }

        self.busy = true;
        let result = self.client.delete().await;
        self.busy = false;

        match result {
            Ok(()) => {
                let (name, _) = R::SCHEMA.deleted;
                tracing::info!("{} deleted", name);
                self.modal = None;
                self.state = ScreenState::Empty;
                self.notices
                    .push_back(Notice::success(format!("{} deleted successfully", name)));
                true
            }
            Err(error) => {
                let (_, noun) = R::SCHEMA.deleted;
                tracing::error!("Error deleting {}: {}", noun, error);
                self.notices.push_back(Notice::error(
                    "Error",
                    format!("Failed to delete {}: {}", noun, error),
                ));
                false
            }
        }
    }

    /// Picks and uploads an image, then writes its URL into the draft.
    ///
    /// The draft is untouched unless the upload produced a URL. A target
    /// that names no image slot is refused before the picker opens.
    pub async fn upload_image(
        &mut self,
        uploader: &ImageUploader,
        library: &impl MediaLibrary,
        target: ImageTarget<'_>,
    ) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        let checked = match modal.draft() {
            Some(draft) => draft.check_image_target(target),
            None => return false,
        };
        if let Err(error) = checked {
            tracing::warn!("Rejected image target {:?}: {}", target, error);
            self.notices.push_back(Notice::error(
                "Error",
                format!("Cannot place image: {}", error),
            ));
            return false;
        }

        modal.set_uploading(true);
        let result = uploader.pick_and_upload(library).await;
        modal.set_uploading(false);

        let url = match result {
            Ok(Some(url)) => url,
            Ok(None) => return false,
            Err(error) => return self.upload_failed(error),
        };
        let written = match modal.draft_mut() {
            Some(draft) => draft.write_image(target, url),
            None => return false,
        };
        if let Err(error) = written {
            tracing::error!("Uploaded image could not be placed: {}", error);
            self.notices.push_back(Notice::error(
                "Error",
                format!("Cannot place image: {}", error),
            ));
            return false;
        }
        true
    }

    fn upload_failed(&mut self, error: Error) -> bool {
        match error {
            Error::PermissionDenied => {
                self.notices.push_back(Notice::error(
                    "Permission Denied",
                    Error::PermissionDenied.to_string(),
                ));
                false
            }
            error => {
                tracing::error!("Error uploading image: {}", error);
                self.notices.push_back(Notice::error(
                    "Error",
                    format!("Failed to upload image: {}", error),
                ));
                false
            }
        }
    }

    /// Plain-text rendering of the current screen.
    pub fn render(&self) -> String {
        let name = R::SCHEMA.name;
        let mut out = String::new();
        let _ = match &self.state {
            ScreenState::Loading => writeln!(out, "Loading {}...", name),
            ScreenState::Empty => writeln!(
                out,
                "No {} Data Found\n\
                 The {} section doesn't exist yet or has been deleted.\n\
                 Create a new one to get started.",
                name,
                R::SCHEMA.noun
            ),
            ScreenState::Loaded(document) => write!(out, "{}", document),
        };

        if let Some(modal) = &self.modal {
            let _ = match modal.mode() {
                ModalMode::Delete => writeln!(
                    out,
                    "\n[Delete {}] Are you sure? This action cannot be undone.",
                    name
                ),
                ModalMode::Create => writeln!(out, "\n[Create {}]", name),
                ModalMode::Edit => writeln!(out, "\n[Edit {}]", name),
            };
        }

        let mut status = Vec::new();
        if self.refreshing {
            status.push("refreshing".to_string());
        }
        if self.busy {
            status.push("working".to_string());
        }
        if self.modal.as_ref().is_some_and(FormModal::is_uploading) {
            status.push("uploading image".to_string());
        }
        if let Some(at) = self.last_refreshed {
            status.push(format!("updated {}", at.format("%H:%M:%S")));
        }
        if !status.is_empty() {
            let _ = writeln!(out, "({})", status.join(", "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::About;
    use awc::Client;

    // Nothing listens on port 9; requests fail fast with a transport error.
    fn offline_screen() -> ResourceScreen<About> {
        ResourceScreen::new(ResourceClient::with_client("http://127.0.0.1:9", Client::default()))
    }

    #[actix_web::test]
    async fn test_new_screen_is_loading() {
        let screen = offline_screen();
        assert_eq!(screen.state(), &ScreenState::Loading);
        assert!(screen.render().starts_with("Loading About..."));
    }

    #[actix_web::test]
    async fn test_edit_and_delete_need_document() {
        let mut screen = offline_screen();
        assert!(!screen.open_modal(ModalMode::Edit));
        assert!(!screen.open_modal(ModalMode::Delete));
        assert!(screen.open_modal(ModalMode::Create));
        assert_eq!(screen.modal().unwrap().mode(), ModalMode::Create);
        screen.cancel_modal();
        assert!(screen.modal().is_none());
    }

    #[actix_web::test]
    async fn test_fetch_failure_ends_empty_with_notice() {
        let mut screen = offline_screen();
        screen.mount().await;
        assert_eq!(screen.state(), &ScreenState::Empty);
        assert!(!screen.is_busy());
        let notice = screen.take_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("Failed to load about data"));
    }

    #[actix_web::test]
    async fn test_invalid_draft_keeps_modal_open() {
        let mut screen = offline_screen();
        screen.open_modal(ModalMode::Create);
        assert!(!screen.submit().await);
        assert!(screen.modal().is_some());
        assert!(!screen.is_busy());
        let notice = screen.take_notice().unwrap();
        assert_eq!(
            notice.message,
            "Please fill in all required fields (title, bio, image)."
        );
    }
}
