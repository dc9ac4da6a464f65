pub mod email;
pub mod fields;
pub mod profile;
pub mod record;
pub mod selection;

pub use email::{email_domain, normalize_email, substitute_domain, DomainAliases};
pub use fields::{FieldEntry, OrderedFields};
pub use profile::{ImageSize, RawProfile};
pub use record::NormalizedRecord;
pub use selection::{FieldKey, FieldSelection};
