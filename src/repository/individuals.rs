use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::template::Entity;
use crate::schema::{AgeRange, FieldSpec, Rule, Schema, ZipTable, CAUSES, SKILLS};
use crate::storage::Collection;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9]+$").expect("static regex"));

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualForm {
    pub firstname: String,
    pub lastname: String,
    pub cause: Vec<String>,
    pub zip: String,
    pub skills: Vec<String>,
    pub age: AgeRange,
}

pub type IndividualDocument = IndividualForm;

pub struct Individuals;

impl Entity for Individuals {
    const COLLECTION: Collection = Collection::Individuals;

    type Form = IndividualForm;
    type Document = IndividualDocument;

    fn schema(zips: Arc<ZipTable>) -> Schema {
        let name = || Rule::Text {
            pattern: &NAME_PATTERN,
            min: NAME_MIN,
            max: NAME_MAX,
        };
        Schema::new(vec![
            FieldSpec::required("firstname", name()),
            FieldSpec::required("lastname", name()),
            FieldSpec::optional("cause", Rule::ManyOf(CAUSES)),
            FieldSpec::required("zip", Rule::UsZip(zips)),
            FieldSpec::optional("skills", Rule::ManyOf(SKILLS)),
            FieldSpec::required("age", Rule::OneOf(AgeRange::LABELS)),
        ])
    }

    fn create(mut form: IndividualForm) -> IndividualDocument {
        dedup_in_order(&mut form.cause);
        dedup_in_order(&mut form.skills);
        form
    }
}

fn dedup_in_order(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}
