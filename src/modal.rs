//! Create / edit / delete modal for one resource

use crate::core::data::ResourceClient;
use crate::draft::Draft;
use crate::error::{Error, Result};
use crate::schema::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit,
    Delete,
}

impl ModalMode {
    /// Past-tense verb used in success notices.
    pub fn done(&self) -> &'static str {
        match self {
            ModalMode::Create => "created",
            ModalMode::Edit => "updated",
            ModalMode::Delete => "deleted",
        }
    }

    /// Infinitive used in failure notices.
    pub fn verb(&self) -> &'static str {
        match self {
            ModalMode::Create => "create",
            ModalMode::Edit => "update",
            ModalMode::Delete => "delete",
        }
    }
}

/// An open modal. The draft lives exactly as long as the modal does.
#[derive(Debug)]
pub struct FormModal<R> {
    mode: ModalMode,
    draft: Option<Draft>,
    uploading: bool,
    _resource: std::marker::PhantomData<fn() -> R>,
}

impl<R: Resource> FormModal<R> {
    pub fn create() -> Self {
        Self::with_draft(ModalMode::Create, Some(Draft::blank(R::SCHEMA)))
    }

    pub fn edit(document: &R) -> Result<Self> {
        Ok(Self::with_draft(
            ModalMode::Edit,
            Some(Draft::from_document(document)?),
        ))
    }

    pub fn delete() -> Self {
        Self::with_draft(ModalMode::Delete, None)
    }

    fn with_draft(mode: ModalMode, draft: Option<Draft>) -> Self {
        FormModal {
            mode,
            draft,
            uploading: false,
            _resource: std::marker::PhantomData,
        }
    }

    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    /// `None` for a delete confirmation.
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.draft.as_mut()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub(crate) fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
    }

    /// Validates and filters the draft into the document that would be sent.
    pub fn prepare(&self) -> Result<R> {
        match &self.draft {
            Some(draft) => draft.into_document(),
            None => Err(Error::validation(format!(
                "Nothing to submit when deleting {}",
                R::SCHEMA.noun
            ))),
        }
    }

    /// Sends the draft with POST (create) or PUT (edit).
    ///
    /// A validation failure returns before any request is made.
    pub async fn submit(&self, client: &ResourceClient<R>) -> Result<R> {
        let document = self.prepare()?;
        if self.mode == ModalMode::Create {
            client.create(&document).await
        } else {
            client.replace(&document).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{About, Services, Specialization};

    #[test]
    fn test_create_starts_blank() {
        let modal = FormModal::<Services>::create();
        assert_eq!(modal.mode(), ModalMode::Create);
        let draft = modal.draft().unwrap();
        assert_eq!(draft.field("title"), Some(""));
        assert_eq!(draft.entries().len(), 1);
        assert!(!modal.is_uploading());
    }

    #[test]
    fn test_edit_seeds_from_document() {
        let about = About {
            title: "Studio X".to_string(),
            bio: "We shoot weddings.".to_string(),
            image: "https://img/x.jpg".to_string(),
            specializations: vec![Specialization {
                title: "Wedding".to_string(),
            }],
        };
        let modal = FormModal::edit(&about).unwrap();
        assert_eq!(modal.mode(), ModalMode::Edit);
        assert_eq!(modal.prepare().unwrap(), about);
    }

    #[test]
    fn test_delete_has_no_draft() {
        let modal = FormModal::<About>::delete();
        assert!(modal.draft().is_none());
        assert!(matches!(modal.prepare(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_mode_wording() {
        assert_eq!(ModalMode::Create.done(), "created");
        assert_eq!(ModalMode::Edit.verb(), "update");
        assert_eq!(ModalMode::Delete.done(), "deleted");
    }
}
