use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Schema, ValidationError, ZipTable};
use crate::storage::{Collection, DocumentStore, Snapshot};

/// A profile type: its schema, where it is stored, and how a validated form
/// becomes a document body.
pub trait Entity {
    const COLLECTION: Collection;

    type Form: DeserializeOwned;
    type Document: Serialize + DeserializeOwned;

    fn schema(zips: Arc<ZipTable>) -> Schema;

    fn create(form: Self::Form) -> Self::Document;
}

/// A form that passed schema validation. Only [`Template::validate`] builds
/// one.
#[derive(Debug, Clone)]
pub struct Validated<F>(F);

impl<F> Validated<F> {
    pub fn into_inner(self) -> F {
        self.0
    }
}

/// Document body built from a validated form. Never deserialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Body<D>(D);

/// Stored shape: identity fields plus the entity body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile<D> {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub picture: String,
    #[serde(flatten)]
    pub body: D,
}

pub struct Template<E: Entity, S> {
    store: S,
    schema: Schema,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: DocumentStore> Template<E, S> {
    pub fn new(store: S, zips: Arc<ZipTable>) -> Self {
        Self {
            store,
            schema: E::schema(zips),
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        E::COLLECTION
    }

    /// Runs the schema, then decodes the normalized object into the form
    /// type. [`ValidationError::Shape`] means the schema and `E::Form`
    /// disagree, not that the caller sent a bad form.
    pub fn validate(&self, form: &Value) -> Result<Validated<E::Form>, ValidationError> {
        let normalized = self.schema.validate(form)?;
        let form = serde_json::from_value(Value::Object(normalized))
            .map_err(|err| ValidationError::Shape(err.to_string()))?;
        Ok(Validated(form))
    }

    pub fn create(&self, form: Validated<E::Form>) -> Body<E::Document> {
        Body(E::create(form.into_inner()))
    }

    /// Wraps the created body in a profile with blank identity fields; the
    /// caller stamps `id`, `email` and `picture` before inserting.
    pub fn form_to_document(&self, form: Validated<E::Form>) -> Profile<Body<E::Document>> {
        Profile {
            id: String::new(),
            email: String::new(),
            picture: String::new(),
            body: self.create(form),
        }
    }

    pub fn insert(&self, doc: &Profile<Body<E::Document>>) -> Result<()> {
        if doc.id.is_empty() {
            anyhow::bail!("cannot insert into {} without an id", E::COLLECTION);
        }
        let data = serde_json::to_value(doc).context("serializing profile")?;
        self.store.insert(E::COLLECTION, &doc.id, &data)
    }

    /// Replaces the body fields of an existing profile. Identity fields are
    /// left untouched.
    pub fn update(&self, id: &str, doc: &Body<E::Document>) -> Result<bool> {
        let data = serde_json::to_value(doc).context("serializing profile")?;
        self.store.update(E::COLLECTION, id, &data)
    }

    pub fn by_id(&self, id: &str) -> Result<Snapshot<Profile<E::Document>>> {
        self.store
            .get(E::COLLECTION, id)?
            .try_map(serde_json::from_value)
            .with_context(|| format!("decoding {}/{}", E::COLLECTION, id))
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(E::COLLECTION, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, Rule};
    use crate::storage::SqliteStore;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct NoteForm {
        note: String,
    }

    /// Schema marks `note` optional while the form requires it.
    struct Mismatched;

    impl Entity for Mismatched {
        const COLLECTION: Collection = Collection::Individuals;

        type Form = NoteForm;
        type Document = NoteForm;

        fn schema(_zips: Arc<ZipTable>) -> Schema {
            Schema::new(vec![FieldSpec::optional("note", Rule::OneOf(&["hi"]))])
        }

        fn create(form: NoteForm) -> NoteForm {
            form
        }
    }

    #[test]
    fn schema_form_mismatch_is_a_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        let template: Template<Mismatched, _> = Template::new(
            SqliteStore::new(dir.path().join("t.sqlite")),
            Arc::new(ZipTable::bundled().unwrap()),
        );

        assert!(template.validate(&json!({ "note": "hi" })).is_ok());
        let err = template.validate(&json!({})).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(msg) if msg.contains("note")));
    }
}
