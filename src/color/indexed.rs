//! The `Indexed` color space.

use crate::color::{ColorComponents, ColorSpace, parse_nested};
use crate::error::{Error, Result};
use crate::object::dict::keys::INDEXED;
use crate::object::{Object, Resolve};
use log::warn;

/// An `Indexed` color space: a palette of colors in a base space, addressed
/// by a single index component.
#[derive(Debug, Clone)]
pub struct Indexed {
    pub(crate) base: ColorSpace,
    pub(crate) hival: u8,
    pub(crate) lookup: Vec<u8>,
}

impl Indexed {
    pub(crate) fn new(items: &[Object], r: &dyn Resolve, depth: usize) -> Result<Self> {
        if items.len() < 4 {
            return Err(Error::Arity {
                context: "Indexed color space",
                expected: 4,
                found: items.len(),
            });
        }

        let base = parse_nested(&items[1], r, depth + 1)?;
        if base.is_indexed() || base.is_pattern() {
            return Err(Error::Classification(
                "the base of an indexed color space must not be Indexed or Pattern".to_string(),
            ));
        }

        let hival = r
            .resolve(&items[2])
            .as_i64()
            .ok_or_else(|| Error::Type {
                context: "Indexed hival".to_string(),
                expected: "integer",
            })
            .and_then(|i| {
                u8::try_from(i).map_err(|_| Error::Range {
                    context: "Indexed hival",
                    value: i as f32,
                    min: 0.0,
                    max: 255.0,
                })
            })?;

        let lookup = match r.resolve(&items[3]) {
            Object::Stream(s) => s.data.clone(),
            Object::String(s) => s.clone(),
            _ => {
                return Err(Error::Type {
                    context: "Indexed lookup table".to_string(),
                    expected: "stream or string",
                });
            }
        };

        let needed = base.num_components() * (usize::from(hival) + 1);
        if lookup.len() < needed {
            // Common in malformed files; lookups are clamped to the last
            // complete entry instead of failing.
            warn!(
                "indexed lookup table too short ({} of {needed} bytes), clamping lookups",
                lookup.len()
            );
        }

        Ok(Self {
            base,
            hival,
            lookup,
        })
    }

    /// Fetch the palette entry for the given index, normalized to `[0, 1]`.
    ///
    /// Out-of-bounds indices are clamped, both against `hival` and against
    /// the last complete entry the table actually holds.
    pub(crate) fn entry(&self, index: usize) -> ColorComponents {
        let n = self.base.num_components().max(1);
        let complete = self.lookup.len() / n;
        let slot = index
            .min(usize::from(self.hival))
            .min(complete.saturating_sub(1));
        let start = slot * n;

        (0..n)
            .map(|i| f32::from(self.lookup.get(start + i).copied().unwrap_or(0)) / 255.0)
            .collect()
    }

    pub(crate) fn to_pdf_object(&self) -> Object {
        Object::Array(vec![
            Object::name(INDEXED),
            self.base.to_pdf_object(),
            Object::Integer(i64::from(self.hival)),
            Object::String(self.lookup.clone()),
        ])
    }
}
