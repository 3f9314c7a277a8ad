mod field_key;
mod payment_method;
mod running_total;

pub use field_key::FieldKey;
pub use payment_method::{PanelVisibility, PaymentMethod};
pub use running_total::RunningTotal;
