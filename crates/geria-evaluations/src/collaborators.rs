//! Interfaces to the records this crate reads but does not own.
//!
//! Subjects, professionals and form definitions are registered elsewhere;
//! images are stored elsewhere. [`DocumentStore`] implements all four over the
//! shared object store using the `geria_core::s3_keys` layout.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use geria_core::models::form::Form;
use geria_core::models::professional::Professional;
use geria_core::models::subject::Subject;
use geria_core::s3_keys;
use geria_storage::state::load_state_opt;
use geria_storage::store::ObjectStore;

use crate::error::EvaluationError;
use crate::images::InlineImage;

#[async_trait]
pub trait SubjectStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Subject>, EvaluationError>;
}

#[async_trait]
pub trait ProfessionalStore: Send + Sync {
    async fn exists(&self, id: Uuid) -> Result<bool, EvaluationError>;
}

#[async_trait]
pub trait FormDefinitionStore: Send + Sync {
    /// The full Form → Sections → Questions → Options → Rules tree.
    async fn load_tree(&self, form_id: Uuid) -> Result<Option<Form>, EvaluationError>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an image and return the reference stored in its place.
    async fn store(&self, image: InlineImage) -> Result<String, EvaluationError>;
}

/// Collaborators backed by JSON documents in an [`ObjectStore`].
#[derive(Clone)]
pub struct DocumentStore {
    store: Arc<dyn ObjectStore>,
}

impl DocumentStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubjectStore for DocumentStore {
    async fn get(&self, id: Uuid) -> Result<Option<Subject>, EvaluationError> {
        let doc = load_state_opt::<Subject>(self.store.as_ref(), &s3_keys::subject(id)).await?;
        Ok(doc.map(|d| d.value))
    }
}

#[async_trait]
impl ProfessionalStore for DocumentStore {
    async fn exists(&self, id: Uuid) -> Result<bool, EvaluationError> {
        let doc =
            load_state_opt::<Professional>(self.store.as_ref(), &s3_keys::professional(id)).await?;
        Ok(doc.is_some())
    }
}

#[async_trait]
impl FormDefinitionStore for DocumentStore {
    async fn load_tree(&self, form_id: Uuid) -> Result<Option<Form>, EvaluationError> {
        let doc = load_state_opt::<Form>(self.store.as_ref(), &s3_keys::form(form_id)).await?;
        Ok(doc.map(|d| d.value))
    }
}

#[async_trait]
impl ImageStore for DocumentStore {
    async fn store(&self, image: InlineImage) -> Result<String, EvaluationError> {
        let key = s3_keys::image(Uuid::new_v4(), image.extension);
        self.store
            .put_if_absent(&key, image.bytes, Some(image.content_type))
            .await?;
        Ok(key)
    }
}

/// The full set of collaborators the lifecycle and history services consume.
#[derive(Clone)]
pub struct Collaborators {
    pub subjects: Arc<dyn SubjectStore>,
    pub professionals: Arc<dyn ProfessionalStore>,
    pub forms: Arc<dyn FormDefinitionStore>,
    pub images: Arc<dyn ImageStore>,
}

impl Collaborators {
    /// Every collaborator backed by documents in `store`.
    pub fn from_store(store: Arc<dyn ObjectStore>) -> Self {
        let docs = Arc::new(DocumentStore::new(store));
        Self {
            subjects: docs.clone(),
            professionals: docs.clone(),
            forms: docs.clone(),
            images: docs,
        }
    }
}
