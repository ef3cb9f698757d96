pub mod format;
pub mod links;
pub mod media;
pub mod paging;
pub mod patch;
pub mod shaping;

pub use format::{AcceptJson, CsvRows, Formatted, Negotiate};
pub use links::{EmployeeLinks, Link, LinkCollectionWrapper, LinkContext, LinkResponse};
pub use media::OutputFormat;
pub use patch::{JsonPatch, PatchError, PatchOperation};
pub use paging::{EmployeeParameters, EmployeeQuery, MetaData, PagedList, RequestParameters};
pub use shaping::{DataShaper, Identifiable, ShapedEntity};
