// ── Wire models ──
//
// Raw JSON shapes served by the directory endpoint. Converted to
// `roster_core` domain types at the crate boundary; nothing here leaks
// to consumers.

use serde::Deserialize;

use roster_core::{Cursor, Page, Person, PersonId};

/// `GET /api/people` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct PeoplePageBody {
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    /// Resume token for the following page; `null`/absent on the last one.
    #[serde(default)]
    pub next: Option<String>,
}

/// One person as served on the wire.
#[derive(Debug, Deserialize)]
pub(crate) struct PersonRecord {
    pub id: PersonId,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

impl From<PeoplePageBody> for Page {
    fn from(body: PeoplePageBody) -> Self {
        Page {
            people: body.people.into_iter().map(Person::from).collect(),
            next: body.next.map(Cursor::from),
        }
    }
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Person {
            id: record.id,
            display_name: record.full_name,
        }
    }
}
