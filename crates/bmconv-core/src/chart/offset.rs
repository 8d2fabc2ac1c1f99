//! Rewrites datum positions for measures whose length is not 1.
//!
//! A measure with ratio `r` stretches the offsets inside it by `r` and shifts
//! everything after it by `r - 1`.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use tracing::debug;

use super::RawDatum;
use crate::error::Result;
use crate::units::{ChartPosition, MeasureRatio};

/// Move every datum onto the continuous timeline defined by `signatures`.
///
/// Datums are visited in measure order alongside the signature changes, so
/// the cost is one sort plus a single merge pass.
pub fn resolve_offsets<'a, I>(datums: I, signatures: &BTreeMap<u32, MeasureRatio>) -> Result<()>
where
    I: IntoIterator<Item = &'a mut RawDatum>,
{
    let mut datums: Vec<&mut RawDatum> = datums.into_iter().collect();
    if signatures.is_empty() {
        return Ok(());
    }
    datums.sort_by_key(|d| d.measure());

    let mut changes = signatures.iter().peekable();
    // Sum of (ratio - 1) over changes in measures already passed
    let mut shift = BigRational::zero();

    for datum in datums {
        let measure = datum.measure();
        while let Some((_, ratio)) = changes.next_if(|(m, _)| **m < measure) {
            shift += ratio.value() - BigRational::one();
        }

        let start = BigRational::from_integer(BigInt::from(measure)) + &shift;
        let offset = match changes.peek() {
            Some((m, ratio)) if **m == measure => datum.local_offset() * ratio.value(),
            _ => datum.local_offset(),
        };
        datum.relocate(ChartPosition::new(start + offset)?);
    }

    debug!("Applied {} time signature changes", signatures.len());
    Ok(())
}
