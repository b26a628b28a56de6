use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::template::Entity;
use crate::schema::{FieldSpec, Rule, Schema, ZipTable};
use crate::storage::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationForm {
    pub zip: String,
}

pub type OrganizationDocument = OrganizationForm;

pub struct Organizations;

impl Entity for Organizations {
    const COLLECTION: Collection = Collection::Organizations;

    type Form = OrganizationForm;
    type Document = OrganizationDocument;

    fn schema(zips: Arc<ZipTable>) -> Schema {
        Schema::new(vec![FieldSpec::required("zip", Rule::UsZip(zips))])
    }

    fn create(form: OrganizationForm) -> OrganizationDocument {
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::template::Template;
    use crate::schema::ValidationError;
    use crate::storage::SqliteStore;
    use serde_json::json;
    use std::io::Write;

    fn orgs(zips: ZipTable) -> (tempfile::TempDir, Template<Organizations, SqliteStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("orgs.sqlite"));
        store.init().unwrap();
        (dir, Template::new(store, Arc::new(zips)))
    }

    #[test]
    fn zip_is_required() {
        let (_dir, orgs) = orgs(ZipTable::bundled().unwrap());
        assert_eq!(
            orgs.validate(&json!({})).unwrap_err(),
            ValidationError::Required("zip")
        );
    }

    #[test]
    fn exact_table_limits_accepted_zips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "92037").unwrap();
        let (_dir, orgs) = orgs(ZipTable::from_path(file.path()).unwrap());
        assert!(orgs.validate(&json!({ "zip": "92037" })).is_ok());
        assert_eq!(
            orgs.validate(&json!({ "zip": "92122" })).unwrap_err(),
            ValidationError::InvalidZip
        );
    }

    #[test]
    fn rejects_individual_fields() {
        let (_dir, orgs) = orgs(ZipTable::bundled().unwrap());
        let err = orgs
            .validate(&json!({ "zip": "92037", "firstname": "Acme" }))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("firstname".into()));
    }

    #[test]
    fn stored_document_carries_identity() {
        let (_dir, orgs) = orgs(ZipTable::bundled().unwrap());
        let mut doc = orgs.form_to_document(orgs.validate(&json!({ "zip": "10001" })).unwrap());
        doc.id = "org-1".into();
        doc.email = "hello@example.org".into();
        orgs.insert(&doc).unwrap();

        let stored = orgs.by_id("org-1").unwrap().into_data().unwrap();
        assert_eq!(stored.id, "org-1");
        assert_eq!(stored.email, "hello@example.org");
        assert_eq!(stored.picture, "");
        assert_eq!(stored.body.zip, "10001");
    }
}
