pub mod config;
pub mod error;
pub mod issue;
pub mod oss;
pub mod path;
pub mod report;
pub mod sarif;
mod util;

pub use error::{Conversion, JoinedError, ParseError, PathResolutionError};
pub use issue::{Issue, Severity};
pub use oss::convert::convert_oss_json_to_issues;
pub use report::{map_scan_response, EnhancedScanResult, OutputMapper};
pub use sarif::convert::convert_sarif_json_to_issues;
