pub mod parse;
pub mod process;
pub mod stats;

use rayon::prelude::*;

use crate::error::ParseError;
use crate::types::activity::ActivityMetrics;

/// Reads a GPX payload and derives its metrics.
pub fn import(bytes: &[u8]) -> Result<ActivityMetrics, ParseError> {
    let document = parse::parse(bytes)?;
    Ok(process::extract(document))
}

/// Imports independent payloads in parallel. Results keep the input order.
pub fn import_many<B>(payloads: &[B]) -> Vec<Result<ActivityMetrics, ParseError>>
where
    B: AsRef<[u8]> + Sync,
{
    payloads
        .par_iter()
        .map(|bytes| import(bytes.as_ref()))
        .collect()
}
