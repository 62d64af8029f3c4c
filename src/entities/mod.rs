// Entity Models
// Plain records for both personas. Every page works on its own copy;
// nothing here is shared or persisted.

pub mod client;
pub mod transaction;
pub mod inbox;
pub mod mandant;

pub use client::{Client, ClientStatus, UnmatchedLevel, VatCadence, VatPeriod};
pub use transaction::{ClientRequest, MatchStatus, Receipt, Resolution, Transaction};
pub use inbox::InboxItem;
pub use mandant::{
    Classification, MandantReceipt, MandantStatus, MandantTransaction, Message, MessageKind,
    PeriodHealth, ReceiptReviewState, ReceiptStatus, TransactionLink, VatPeriodStatus,
};
