pub mod csv_incidents;
pub mod error;
pub mod selector;
pub mod source;

pub use csv_incidents::{CsvIncidentSource, normalize_header, read_incident_csv};
pub use error::IngestError;
pub use selector::{select, selection_order};
pub use source::IncidentSource;
