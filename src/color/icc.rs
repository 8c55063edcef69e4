//! The `ICCBased` color space.
//!
//! Full ICC profile interpretation is out of scope. The profile bytes are
//! retained for round-tripping, but conversion only ever consults the
//! `Alternate` entry, falling back to the device space matching `N`.

use crate::color::{ColorSpace, parse_nested};
use crate::error::{Error, Result};
use crate::object::dict::keys::{ALTERNATE, ICC_BASED, N, RANGE};
use crate::object::{Dict, Object, Resolve, Stream};
use log::warn;

/// An `ICCBased` color space.
#[derive(Debug, Clone)]
pub struct IccBased {
    pub(crate) n: usize,
    pub(crate) alternate: Option<ColorSpace>,
    pub(crate) range: Option<Vec<f32>>,
    pub(crate) data: Vec<u8>,
    /// The space conversions delegate to: the alternate if one was given,
    /// the device space matching `n` otherwise.
    pub(crate) working: ColorSpace,
}

impl IccBased {
    pub(crate) fn new(items: &[Object], r: &dyn Resolve, depth: usize) -> Result<Self> {
        let stream = items
            .get(1)
            .map(|o| r.resolve(o))
            .and_then(Object::as_stream)
            .ok_or_else(|| Error::Type {
                context: "ICCBased color space".to_string(),
                expected: "profile stream",
            })?;

        let dict = &stream.dict;
        let n = dict.get_required::<usize>(N, r)?;
        if !matches!(n, 1 | 3 | 4) {
            return Err(Error::Range {
                context: "ICCBased N",
                value: n as f32,
                min: 1.0,
                max: 4.0,
            });
        }

        let range = dict.get::<Vec<f32>>(RANGE, r)?;
        if let Some(range) = &range
            && range.len() != 2 * n
        {
            return Err(Error::Arity {
                context: "ICCBased Range",
                expected: 2 * n,
                found: range.len(),
            });
        }

        let alternate = match dict.get_raw(ALTERNATE) {
            Some(obj) => Some(parse_nested(obj, r, depth + 1)?),
            None => None,
        };

        if let Some(alternate) = &alternate
            && alternate.num_components() != n
        {
            return Err(Error::Arity {
                context: "ICCBased alternate",
                expected: n,
                found: alternate.num_components(),
            });
        }

        let working = match &alternate {
            Some(alternate) => alternate.clone(),
            None => {
                warn!("ICCBased stream without alternate, falling back to device space ({n})");

                ColorSpace::device_for(n)
            }
        };

        Ok(Self {
            n,
            alternate,
            range,
            data: stream.data.clone(),
            working,
        })
    }

    pub(crate) fn decode_array(&self) -> Vec<f32> {
        match &self.range {
            Some(range) => range.clone(),
            None => [0.0, 1.0].repeat(self.n),
        }
    }

    pub(crate) fn to_pdf_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert(N, self.n as i64);
        if let Some(range) = &self.range {
            dict.insert(RANGE, range.clone());
        }
        if let Some(alternate) = &self.alternate {
            dict.insert(ALTERNATE, alternate.to_pdf_object());
        }

        Object::Array(vec![
            Object::name(ICC_BASED),
            Object::Stream(Stream::new(dict, self.data.clone())),
        ])
    }
}
