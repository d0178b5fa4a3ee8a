//! The dialer import schema: 34 named columns in a fixed order.

use serde::ser::{Serialize, SerializeMap, Serializer};

pub const OUTPUT_WIDTH: usize = 34;

/// Value of the dial-now flag on every emitted row.
pub const DIAL_NOW: &str = "S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputField {
    Id,
    ClientId,
    FirstName,
    Cpf,
    AreaCode1,
    Phone1,
    AreaCode2,
    Phone2,
    AreaCode3,
    Phone3,
    AreaCode4,
    Phone4,
    AreaCode5,
    Phone5,
    Email,
    City,
    State,
    PostalCode,
    ScheduledAt,
    DialNow,
    Priority,
    Agent,
    Campaign,
    Notes,
    Field1,
    Field2,
    Field3,
    Field4,
    Field5,
    Field6,
    Field7,
    Field8,
    Field9,
    Field10,
}

const NAMES: [&str; OUTPUT_WIDTH] = [
    "ID",
    "ID_CLIENTE",
    "NOME",
    "CPF",
    "DDD1",
    "TELEFONE1",
    "DDD2",
    "TELEFONE2",
    "DDD3",
    "TELEFONE3",
    "DDD4",
    "TELEFONE4",
    "DDD5",
    "TELEFONE5",
    "EMAIL",
    "CIDADE",
    "UF",
    "CEP",
    "DATA_AGENDAMENTO",
    "DISCAR_AGORA",
    "PRIORIDADE",
    "OPERADOR",
    "CAMPANHA",
    "OBSERVACAO",
    "CAMPO1",
    "CAMPO2",
    "CAMPO3",
    "CAMPO4",
    "CAMPO5",
    "CAMPO6",
    "CAMPO7",
    "CAMPO8",
    "CAMPO9",
    "CAMPO10",
];

impl OutputField {
    pub const ALL: [OutputField; OUTPUT_WIDTH] = [
        OutputField::Id,
        OutputField::ClientId,
        OutputField::FirstName,
        OutputField::Cpf,
        OutputField::AreaCode1,
        OutputField::Phone1,
        OutputField::AreaCode2,
        OutputField::Phone2,
        OutputField::AreaCode3,
        OutputField::Phone3,
        OutputField::AreaCode4,
        OutputField::Phone4,
        OutputField::AreaCode5,
        OutputField::Phone5,
        OutputField::Email,
        OutputField::City,
        OutputField::State,
        OutputField::PostalCode,
        OutputField::ScheduledAt,
        OutputField::DialNow,
        OutputField::Priority,
        OutputField::Agent,
        OutputField::Campaign,
        OutputField::Notes,
        OutputField::Field1,
        OutputField::Field2,
        OutputField::Field3,
        OutputField::Field4,
        OutputField::Field5,
        OutputField::Field6,
        OutputField::Field7,
        OutputField::Field8,
        OutputField::Field9,
        OutputField::Field10,
    ];

    pub fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    pub fn header() -> [&'static str; OUTPUT_WIDTH] {
        NAMES
    }

    /// Fields the pipeline never computes; they copy a same-named input
    /// column when one exists. Phone slots 2-5 stay blank.
    pub fn carries_input(self) -> bool {
        !matches!(
            self,
            OutputField::Id
                | OutputField::ClientId
                | OutputField::FirstName
                | OutputField::AreaCode1
                | OutputField::Phone1
                | OutputField::AreaCode2
                | OutputField::Phone2
                | OutputField::AreaCode3
                | OutputField::Phone3
                | OutputField::AreaCode4
                | OutputField::Phone4
                | OutputField::AreaCode5
                | OutputField::Phone5
                | OutputField::ScheduledAt
                | OutputField::DialNow
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    values: Vec<String>,
}

impl OutputRecord {
    pub fn get(&self, field: OutputField) -> &str {
        &self.values[field as usize]
    }

    /// All 34 values in schema order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(OUTPUT_WIDTH))?;
        for (name, value) in NAMES.iter().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub(crate) struct OutputRecordBuilder {
    values: Vec<String>,
}

impl OutputRecordBuilder {
    pub(crate) fn new() -> Self {
        Self {
            values: vec![String::new(); OUTPUT_WIDTH],
        }
    }

    pub(crate) fn set(&mut self, field: OutputField, value: impl Into<String>) -> &mut Self {
        self.values[field as usize] = value.into();
        self
    }

    pub(crate) fn build(self) -> OutputRecord {
        OutputRecord {
            values: self.values,
        }
    }
}
