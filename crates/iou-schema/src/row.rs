use iou_core::{Currency, IouState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{IOU_SCHEMA_V1, MappedSchema, SchemaError};

/// Flattened, indexable form of one IOU version under [`IOU_SCHEMA_V1`].
///
/// Party and currency columns hold display strings only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersistentIou {
    #[sqlx(rename = "lender")]
    pub lender_name: String,
    #[sqlx(rename = "borrower")]
    pub borrower_name: String,
    pub currency: String,
    pub value: i64,
    pub paid_currency: String,
    pub paid_value: i64,
    pub linear_id: Uuid,
}

impl PersistentIou {
    pub fn projection_key(&self) -> Uuid {
        self.linear_id
    }
}

pub fn project<C: Currency>(state: &IouState<C>) -> PersistentIou {
    PersistentIou {
        lender_name: state.lender().to_string(),
        borrower_name: state.borrower().to_string(),
        currency: state.amount().token_code().to_string(),
        value: state.amount().quantity(),
        paid_currency: state.paid().token_code().to_string(),
        paid_value: state.paid().quantity(),
        linear_id: state.linear_id().id,
    }
}

pub fn projection_key(row: &PersistentIou) -> Uuid {
    row.projection_key()
}

/// A state that can be flattened into one or more relational schemas.
pub trait QueryableState {
    type Row;

    fn supported_schemas(&self) -> &'static [&'static MappedSchema];
    fn generate_mapped_object(&self, schema: &MappedSchema) -> Result<Self::Row, SchemaError>;
}

static SUPPORTED_SCHEMAS: [&MappedSchema; 1] = [&IOU_SCHEMA_V1];

impl<C: Currency> QueryableState for IouState<C> {
    type Row = PersistentIou;

    fn supported_schemas(&self) -> &'static [&'static MappedSchema] {
        &SUPPORTED_SCHEMAS
    }

    fn generate_mapped_object(&self, schema: &MappedSchema) -> Result<PersistentIou, SchemaError> {
        if schema.is(&IOU_SCHEMA_V1) {
            Ok(project(self))
        } else {
            Err(schema.unsupported())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iou_core::{Amount, Eur, Party, UniqueIdentifier, Usd};

    fn usd(quantity: i64) -> Amount<Usd> {
        Amount::new(quantity).expect("test amounts are non-negative")
    }

    #[test]
    fn projects_every_column() {
        let iou = IouState::issue(usd(1000), Party::new("A"), Party::new("B"))
            .pay(usd(400))
            .unwrap();
        let row = project(&iou);

        assert_eq!(
            row,
            PersistentIou {
                lender_name: "A".into(),
                borrower_name: "B".into(),
                currency: "USD".into(),
                value: 1000,
                paid_currency: "USD".into(),
                paid_value: 400,
                linear_id: iou.linear_id().id,
            }
        );
    }

    #[test]
    fn projection_is_deterministic_and_keyed_by_linear_id() {
        let iou = IouState::issue(Amount::<Eur>::new(5).unwrap(), Party::new("A"), Party::new("B"));
        assert_eq!(project(&iou), project(&iou));
        assert_eq!(projection_key(&project(&iou)), iou.linear_id().id);
    }

    #[test]
    fn external_id_is_not_part_of_the_key() {
        let id = UniqueIdentifier::with_external_id("ref-1");
        let iou = IouState::issue_with_id(usd(1), Party::new("A"), Party::new("B"), id.clone());
        assert_eq!(project(&iou).projection_key(), id.id);
    }

    #[test]
    fn v1_is_the_only_supported_schema() {
        let iou = IouState::issue(usd(1), Party::new("A"), Party::new("B"));
        assert_eq!(iou.supported_schemas(), &[&IOU_SCHEMA_V1]);
        assert_eq!(iou.generate_mapped_object(&IOU_SCHEMA_V1).unwrap(), project(&iou));
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let iou = IouState::issue(usd(1), Party::new("A"), Party::new("B"));
        let other = MappedSchema {
            family: "CashSchema",
            version: 1,
            ..IOU_SCHEMA_V1
        };

        assert_eq!(
            iou.generate_mapped_object(&other),
            Err(SchemaError::Unsupported {
                family: "CashSchema",
                version: 1,
            })
        );
    }
}
