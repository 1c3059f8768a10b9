use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

const FIRST_NAMES: [&str; 6] = ["John", "Jane", "Michael", "Emily", "Chris", "Sarah"];
const LAST_NAMES: [&str; 6] = ["Smith", "Doe", "Brown", "Johnson", "Taylor", "Lee"];
const DOMAINS: [&str; 4] = ["gmail.com", "yahoo.com", "outlook.com", "example.com"];
const COMPANIES: [&str; 5] = ["Google", "Microsoft", "Toddle", "Tesla", "Facebook"];

// Phone numbers are drawn from [PHONE_MIN, PHONE_MAX), always 10 digits.
pub const PHONE_MIN: u64 = 1_000_000_000;
pub const PHONE_MAX: u64 = 10_000_000_000;

/// The fields a contact record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Field {
    Name,
    Email,
    Phone,
    Company,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Phone, Field::Company];

    /// Resolve a field identifier. Unknown identifiers map to `None`.
    pub fn parse(id: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Company => "company",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Company => "Company",
        }
    }
}

/// Column position to field. Header order and cell read/write order are both
/// derived from this table.
pub const COLUMN_FIELDS: [Field; 4] = [Field::Name, Field::Company, Field::Email, Field::Phone];

pub fn field_at(column: usize) -> Option<Field> {
    COLUMN_FIELDS.get(column).copied()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Company => &self.company,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Company => self.company = value,
        }
    }
}

/// Fixed length, insertion ordered collection of records.
#[derive(Debug, Default)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Record> {
        self.records.get(row)
    }

    pub fn get_mut(&mut self, row: usize) -> Option<&mut Record> {
        self.records.get_mut(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Table { records }
    }
}

/// Produces synthetic contact tables.
///
/// Seeding the generator makes the produced table reproducible, which the
/// tests and the `--seed` flag rely on.
pub struct RecordGenerator {
    rng: StdRng,
}

impl RecordGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate `count` records populating the requested `fields`.
    ///
    /// Unknown field identifiers are skipped. The name is drawn for every row
    /// since the email is derived from it, but it is only stored when `name`
    /// was requested.
    pub fn generate<S: AsRef<str>>(&mut self, fields: &[S], count: usize) -> Table {
        let mut requested = Vec::with_capacity(fields.len());
        for id in fields.iter().map(|f| f.as_ref()) {
            match Field::parse(id) {
                Some(field) if !requested.contains(&field) => requested.push(field),
                Some(_) => {}
                None => trace!("Skipping unsupported field \"{id}\""),
            }
        }

        let records = (0..count).map(|_| self.record(&requested)).collect::<Vec<Record>>();
        debug!("Generated {} records with fields {:?}", records.len(), requested);
        Table::from(records)
    }

    fn record(&mut self, fields: &[Field]) -> Record {
        let mut record = Record::default();
        let name = self.name();
        for field in fields {
            match field {
                Field::Name => record.name = name.clone(),
                Field::Email => record.email = self.email(&name),
                Field::Phone => record.phone = self.phone(),
                Field::Company => record.company = self.pick(&COMPANIES).to_string(),
            }
        }
        record
    }

    fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        // Pools are non-empty constants
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn email(&mut self, name: &str) -> String {
        let local = name.split(' ').collect::<Vec<&str>>().join(".").to_lowercase();
        format!("{local}@{}", self.pick(&DOMAINS))
    }

    fn phone(&mut self) -> String {
        format!("+1-{}", self.rng.gen_range(PHONE_MIN..PHONE_MAX))
    }
}
