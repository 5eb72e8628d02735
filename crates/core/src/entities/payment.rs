use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::{ClientId, PaymentId};
use crate::validation::{FormCheck, Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    Card,
    Yape,
    Plin,
}

impl PaymentMethod {
    /// Methods whose operations carry a bank/wallet reference number.
    pub fn needs_reference(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

/// Payment read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub client_id: ClientId,
    pub amount: f64,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
}

impl Resource for Payment {
    type Id = PaymentId;

    const PATH: &'static str = "/payments";
    const ROUTE_CODE: &'static str = "payments";

    fn id(&self) -> PaymentId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub client_id: Option<ClientId>,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

impl Validate for PaymentForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let has_reference = self
            .reference
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());

        FormCheck::new()
            .check("clientId", self.client_id.is_some(), "is required")
            .positive("amount", self.amount)
            .check(
                "reference",
                !self.method.needs_reference() || has_reference,
                "is required for non-cash payments",
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(method: PaymentMethod, reference: Option<&str>) -> PaymentForm {
        PaymentForm {
            client_id: Some(ClientId::new(1)),
            amount: 60.0,
            payment_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            method,
            reference: reference.map(str::to_string),
        }
    }

    #[test]
    fn cash_needs_no_reference() {
        assert!(form(PaymentMethod::Cash, None).validate().is_ok());
    }

    #[test]
    fn transfer_needs_reference() {
        let errors = form(PaymentMethod::Transfer, Some(" ")).validate().unwrap_err();
        assert!(errors.has("reference"));
        assert!(form(PaymentMethod::Yape, Some("OP-88812")).validate().is_ok());
    }

    #[test]
    fn non_positive_amount_rejected() {
        let f = PaymentForm { amount: -5.0, ..form(PaymentMethod::Cash, None) };
        assert!(f.validate().unwrap_err().has("amount"));
    }
}
