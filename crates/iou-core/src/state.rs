use serde::{Deserialize, Serialize};

use crate::amount::{Amount, AmountError, Currency};
use crate::identity::{Party, UniqueIdentifier};

/// One version of an IOU: `borrower` owes `amount` to `lender`, of which
/// `paid` has been settled so far.
///
/// Values are never mutated. Every transition returns a new version that
/// keeps the same `linear_id`. Business rules such as "paid must not exceed
/// amount" or "lender and borrower differ" belong to the transaction
/// verifier, not to this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct IouState<C: Currency> {
    amount: Amount<C>,
    lender: Party,
    borrower: Party,
    paid: Amount<C>,
    linear_id: UniqueIdentifier,
}

impl<C: Currency> IouState<C> {
    pub fn issue(amount: Amount<C>, lender: Party, borrower: Party) -> Self {
        Self::issue_with_id(amount, lender, borrower, UniqueIdentifier::new())
    }

    pub fn issue_with_id(
        amount: Amount<C>,
        lender: Party,
        borrower: Party,
        linear_id: UniqueIdentifier,
    ) -> Self {
        Self {
            amount,
            lender,
            borrower,
            paid: Amount::zero(),
            linear_id,
        }
    }

    /// Adds `amount_to_pay` to `paid`. No bound check against `amount`.
    pub fn pay(&self, amount_to_pay: Amount<C>) -> Result<Self, AmountError> {
        Ok(Self {
            paid: self.paid.plus(amount_to_pay)?,
            ..self.clone()
        })
    }

    pub fn with_new_lender(&self, new_lender: Party) -> Self {
        Self {
            lender: new_lender,
            ..self.clone()
        }
    }

    /// The parties that can use this state in a transaction.
    pub fn participants(&self) -> [&Party; 2] {
        [&self.lender, &self.borrower]
    }

    pub fn amount(&self) -> Amount<C> {
        self.amount
    }

    pub fn lender(&self) -> &Party {
        &self.lender
    }

    pub fn borrower(&self) -> &Party {
        &self.borrower
    }

    pub fn paid(&self) -> Amount<C> {
        self.paid
    }

    pub fn linear_id(&self) -> &UniqueIdentifier {
        &self.linear_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::{Gbp, Usd};

    fn usd(quantity: i64) -> Amount<Usd> {
        Amount::new(quantity).expect("test amounts are non-negative")
    }

    fn sample() -> IouState<Usd> {
        IouState::issue(usd(1000), Party::new("A"), Party::new("B"))
    }

    #[test]
    fn issue_starts_unpaid_with_fresh_id() {
        let iou = sample();
        assert_eq!(iou.paid(), usd(0));
        assert_eq!(iou.paid().token_code(), "USD");
        assert!(!iou.linear_id().id.is_nil());
        assert_ne!(iou.linear_id(), sample().linear_id());
    }

    #[test]
    fn transitions_preserve_linear_id() {
        let iou = sample();
        assert_eq!(iou.pay(usd(10)).unwrap().linear_id(), iou.linear_id());
        assert_eq!(
            iou.with_new_lender(Party::new("C")).linear_id(),
            iou.linear_id()
        );
    }

    #[test]
    fn payments_accumulate() {
        let iou = sample();
        let paid_twice = iou.pay(usd(150)).unwrap().pay(usd(275)).unwrap();
        assert_eq!(paid_twice.paid(), usd(425));
        assert_eq!(paid_twice.amount(), iou.amount());
    }

    #[test]
    fn pay_does_not_cap_at_principal() {
        let overpaid = sample().pay(usd(1500)).unwrap();
        assert_eq!(overpaid.paid().quantity(), 1500);
    }

    #[test]
    fn pay_overflow_leaves_original_untouched() {
        let iou = sample().pay(usd(i64::MAX)).unwrap();
        let snapshot = iou.clone();
        assert!(matches!(iou.pay(usd(1)), Err(AmountError::Overflow { .. })));
        assert_eq!(iou, snapshot);
    }

    #[test]
    fn new_lender_changes_only_lender() {
        let iou = sample().pay(usd(400)).unwrap();
        let moved = iou.with_new_lender(Party::new("C"));

        assert_eq!(moved.lender(), &Party::new("C"));
        assert_eq!(moved.borrower(), iou.borrower());
        assert_eq!(moved.amount(), iou.amount());
        assert_eq!(moved.paid(), iou.paid());
        assert_eq!(moved.linear_id(), iou.linear_id());
    }

    #[test]
    fn transitions_do_not_mutate_input() {
        let iou = sample();
        let snapshot = iou.clone();
        let _ = iou.pay(usd(99)).unwrap();
        let _ = iou.with_new_lender(Party::new("Z"));
        assert_eq!(iou, snapshot);
    }

    #[test]
    fn participants_are_lender_then_borrower() {
        let iou = sample();
        let participants = iou.participants();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants, [&Party::new("A"), &Party::new("B")]);
    }

    #[test]
    fn issue_with_id_keeps_external_reference() {
        let id = UniqueIdentifier::with_external_id("loan-7");
        let iou = IouState::issue_with_id(
            Amount::<Gbp>::new(50).unwrap(),
            Party::new("A"),
            Party::new("B"),
            id.clone(),
        );
        assert_eq!(iou.linear_id(), &id);
        assert_eq!(iou.paid().token_code(), "GBP");
    }

    #[test]
    fn serde_round_trip_keeps_identity() {
        let iou = sample().pay(usd(1)).unwrap();
        let json = serde_json::to_string(&iou).unwrap();
        let back: IouState<Usd> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iou);
    }
}
