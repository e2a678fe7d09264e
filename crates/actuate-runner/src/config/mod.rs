pub mod descriptor;
pub mod params;
pub mod schema;

pub use descriptor::{Descriptor, ErrorObserver};
pub use params::{ParamDef, Params};
pub use schema::{BrowserConfig, Config, TargetUrl, Viewport};
