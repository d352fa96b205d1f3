use std::fmt::{self, Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::DocumentNumber;

/// Placeholder assigned when the ledger does not record how a movement was paid.
pub const UNSPECIFIED_PAYMENT_METHOD: &str = "No especificado";
/// What an unspecified payment method is shown as on non-invoice rows.
pub const TRANSFER_PAYMENT_METHOD: &str = "Transferencia";

const INVOICE_MARKER: &str = "Factura";

/// A single entry as returned by `GET /movimientos`.
///
/// Field names follow the ledger's wire format. Nothing in the pipeline
/// mutates it; normalization copies what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMovement {
    /// Ledger transaction code.
    #[serde(rename = "codigo", default, deserialize_with = "null_as_default")]
    pub code: u64,
    /// Counterparty (customer) code.
    #[serde(rename = "cod_cli_prov", default, deserialize_with = "null_as_default")]
    pub counterparty_code: u64,
    #[serde(rename = "tipo_comprobante", default, deserialize_with = "null_as_default")]
    pub document_type_code: u32,
    /// Short document code such as `FA`, `RB A` or `NC B`.
    #[serde(rename = "nombre_comprobante", default, deserialize_with = "null_as_default")]
    pub document_type: String,
    #[serde(rename = "numero", default, deserialize_with = "null_as_default")]
    pub document_number: DocumentNumber,
    /// Transaction date, ISO formatted, possibly with a time component.
    #[serde(rename = "fecha", default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "importe_neto", default, deserialize_with = "null_as_default")]
    pub net_amount: Decimal,
    #[serde(rename = "fecha_vto", default)]
    pub due_date: Option<String>,
    #[serde(rename = "fecha_comprobante", default)]
    pub document_date: Option<String>,
    /// Gross amount. Its magnitude is what moves the balance.
    #[serde(rename = "importe_total", default, deserialize_with = "null_as_default")]
    pub total_amount: Decimal,
    #[serde(rename = "comentario", default)]
    pub comment: Option<String>,
    #[serde(rename = "estado", default, deserialize_with = "null_as_default")]
    pub status: i32,
    #[serde(rename = "efectivo", default)]
    pub payment_method: Option<String>,
}

/// The ledger sends `null` for fields it has no value for. Those read as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Human category of a movement, resolved from its document short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Invoice(char),
    Receipt(char),
    CreditNote(char),
    DebitNote(char),
    /// Unrecognized short code, kept verbatim.
    Other(String),
}

impl Category {
    pub fn resolve(document_type: &str) -> Self {
        match document_type {
            "FA" => Category::Invoice('A'),
            "FB" => Category::Invoice('B'),
            "FC" => Category::Invoice('C'),
            "FE" => Category::Invoice('E'),
            "RB A" => Category::Receipt('A'),
            "RB B" => Category::Receipt('B'),
            "NC A" => Category::CreditNote('A'),
            "NC B" => Category::CreditNote('B'),
            "NC C" => Category::CreditNote('C'),
            "NC E" => Category::CreditNote('E'),
            "ND A" => Category::DebitNote('A'),
            "ND B" => Category::DebitNote('B'),
            "ND C" => Category::DebitNote('C'),
            "ND E" => Category::DebitNote('E'),
            other => Category::Other(other.to_string()),
        }
    }

    /// Invoices are every category whose label mentions "Factura",
    /// including unrecognized codes that happen to.
    pub fn is_invoice(&self) -> bool {
        match self {
            Category::Invoice(_) => true,
            Category::Other(code) => code.contains(INVOICE_MARKER),
            _ => false,
        }
    }
}

impl Display for Category {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Category::Invoice(letter) => write!(formatter, "{INVOICE_MARKER} {letter}"),
            Category::Receipt(letter) => write!(formatter, "Recibo {letter}"),
            Category::CreditNote(letter) => write!(formatter, "Nota de Crédito {letter}"),
            Category::DebitNote(letter) => write!(formatter, "Nota de Débito {letter}"),
            Category::Other(code) => formatter.write_str(code),
        }
    }
}

/// A movement after normalization, one per [`RawMovement`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMovement {
    /// `dd/mm/yyyy`, or the raw date when it could not be parsed.
    pub display_date: String,
    /// The ledger's date string, kept for chronological ordering.
    pub original_date: String,
    pub category: Category,
    /// Negative for invoices, positive for everything else.
    pub amount: Decimal,
    pub payment_method: String,
    /// Balance after this movement. Zero until reconciled.
    pub running_balance: Decimal,
    pub document_number: DocumentNumber,
    pub raw: RawMovement,
}

impl NormalizedMovement {
    pub fn is_invoice(&self) -> bool {
        self.category.is_invoice()
    }

    /// Payment method as shown to the operator. Invoices show none.
    pub fn payment_method_label(&self) -> &str {
        if self.is_invoice() {
            ""
        } else if self.payment_method == UNSPECIFIED_PAYMENT_METHOD {
            TRANSFER_PAYMENT_METHOD
        } else {
            &self.payment_method
        }
    }
}
