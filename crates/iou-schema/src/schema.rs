use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unsupported schema {family} v{version}")]
    Unsupported { family: &'static str, version: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
}

/// Non-unique secondary index over one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    pub name: &'static str,
    pub column: &'static str,
}

/// A versioned relational layout that a queryable state can be mapped into.
///
/// Schemas are identified by `(family, version)`. The first column is the
/// table's primary key. `sequence_column` is store bookkeeping, not part of
/// the projected row: it holds the vault sequence of the version a row was
/// derived from, so a store never replaces a row with an older version.
#[derive(Debug, Clone, Copy)]
pub struct MappedSchema {
    pub family: &'static str,
    pub version: u32,
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
    pub sequence_column: &'static str,
    pub indexes: &'static [IndexDef],
}

impl MappedSchema {
    pub fn is(&self, other: &MappedSchema) -> bool {
        self.family == other.family && self.version == other.version
    }

    pub fn unsupported(&self) -> SchemaError {
        SchemaError::Unsupported {
            family: self.family,
            version: self.version,
        }
    }

    /// Idempotent DDL creating the table and its indexes.
    pub fn create_statements(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for (position, column) in self.columns.iter().enumerate() {
            if position == 0 {
                columns.push(format!("{} {} PRIMARY KEY", column.name, column.sql_type));
            } else {
                columns.push(format!("{} {} NOT NULL", column.name, column.sql_type));
            }
        }
        columns.push(format!("{} BIGINT NOT NULL", self.sequence_column));

        let mut statements = vec![format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table,
            columns.join(", ")
        )];
        statements.extend(self.indexes.iter().map(|index| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                index.name, self.table, index.column
            )
        }));
        statements
    }
}

impl PartialEq for MappedSchema {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for MappedSchema {}

impl fmt::Display for MappedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.family, self.version)
    }
}

pub const IOU_SCHEMA_V1: MappedSchema = MappedSchema {
    family: "IouSchema",
    version: 1,
    table: "iou_states",
    columns: &[
        ColumnDef {
            name: "linear_id",
            sql_type: "UUID",
        },
        ColumnDef {
            name: "lender",
            sql_type: "TEXT",
        },
        ColumnDef {
            name: "borrower",
            sql_type: "TEXT",
        },
        ColumnDef {
            name: "currency",
            sql_type: "TEXT",
        },
        ColumnDef {
            name: "value",
            sql_type: "BIGINT",
        },
        ColumnDef {
            name: "paid_currency",
            sql_type: "TEXT",
        },
        ColumnDef {
            name: "paid_value",
            sql_type: "BIGINT",
        },
    ],
    sequence_column: "state_sequence",
    indexes: &[
        IndexDef {
            name: "ioustates_lender",
            column: "lender",
        },
        IndexDef {
            name: "ioustate_value",
            column: "value",
        },
    ],
};
