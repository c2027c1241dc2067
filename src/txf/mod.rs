// TXF module - record classification and V042 serialization

pub mod classification;
pub mod writer;

pub use classification::{Form8949Code, RecordType};
pub use writer::{TxfWriter, TXF_VERSION};
