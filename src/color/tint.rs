//! The `Separation` and `DeviceN` color spaces.
//!
//! Both delegate to an alternate color space through a tint-transform
//! function. The transform is opaque to the engine, so arity mismatches
//! between the colorant count and the function only surface at conversion
//! time.

use crate::color::{ColorComponents, ColorSpace, parse_nested};
use crate::error::{Error, Result};
use crate::function::{Function, interpolate};
use crate::object::dict::keys::{DEVICE_N, NONE, SEPARATION};
use crate::object::{Dict, Name, Object, Resolve};

/// A `Separation` color space: a single named colorant.
#[derive(Debug, Clone)]
pub struct Separation {
    pub(crate) colorant: Name,
    pub(crate) alternate: ColorSpace,
    pub(crate) tint_transform: Function,
}

impl Separation {
    pub(crate) fn new(items: &[Object], r: &dyn Resolve, depth: usize) -> Result<Self> {
        if items.len() < 4 {
            return Err(Error::Arity {
                context: "Separation color space",
                expected: 4,
                found: items.len(),
            });
        }

        let colorant = r
            .resolve(&items[1])
            .as_name()
            .cloned()
            .ok_or_else(|| Error::Type {
                context: "Separation colorant".to_string(),
                expected: "name",
            })?;
        let alternate = parse_alternate(&items[2], r, depth)?;
        let tint_transform = Function::new(&items[3], r)?;

        Ok(Self {
            colorant,
            alternate,
            tint_transform,
        })
    }

    /// Whether this is the special `None` colorant, which never produces
    /// visible output.
    pub(crate) fn is_none(&self) -> bool {
        self.colorant.as_bytes() == NONE
    }

    pub(crate) fn to_rgb(&self, components: &[f32], image_path: bool) -> Result<[f32; 3]> {
        tint_to_rgb(
            &self.tint_transform,
            &self.alternate,
            components,
            image_path,
        )
    }

    pub(crate) fn to_pdf_object(&self) -> Object {
        Object::Array(vec![
            Object::name(SEPARATION),
            Object::Name(self.colorant.clone()),
            self.alternate.to_pdf_object(),
            self.tint_transform.to_pdf_object(),
        ])
    }
}

/// A `DeviceN` color space: several named colorants converted together.
#[derive(Debug, Clone)]
pub struct DeviceN {
    pub(crate) colorants: Vec<Name>,
    pub(crate) alternate: ColorSpace,
    pub(crate) tint_transform: Function,
    /// The optional attributes dictionary, retained opaquely for
    /// serialization.
    pub(crate) attributes: Option<Dict>,
}

impl DeviceN {
    pub(crate) fn new(items: &[Object], r: &dyn Resolve, depth: usize) -> Result<Self> {
        if items.len() < 4 {
            return Err(Error::Arity {
                context: "DeviceN color space",
                expected: 4,
                found: items.len(),
            });
        }

        let colorants = r
            .resolve(&items[1])
            .as_array()
            .ok_or_else(|| Error::Type {
                context: "DeviceN colorants".to_string(),
                expected: "array of names",
            })?
            .iter()
            .map(|o| r.resolve(o).as_name().cloned())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Type {
                context: "DeviceN colorants".to_string(),
                expected: "array of names",
            })?;

        if colorants.is_empty() {
            return Err(Error::Arity {
                context: "DeviceN colorants",
                expected: 1,
                found: 0,
            });
        }

        let alternate = parse_alternate(&items[2], r, depth)?;
        let tint_transform = Function::new(&items[3], r)?;
        let attributes = items
            .get(4)
            .map(|o| {
                r.resolve(o).as_dict().cloned().ok_or_else(|| Error::Type {
                    context: "DeviceN attributes".to_string(),
                    expected: "dictionary",
                })
            })
            .transpose()?;

        Ok(Self {
            colorants,
            alternate,
            tint_transform,
            attributes,
        })
    }

    /// Whether every colorant is the special `None` name.
    pub(crate) fn is_none(&self) -> bool {
        self.colorants.iter().all(|n| n.as_bytes() == NONE)
    }

    pub(crate) fn to_rgb(&self, components: &[f32], image_path: bool) -> Result<[f32; 3]> {
        tint_to_rgb(
            &self.tint_transform,
            &self.alternate,
            components,
            image_path,
        )
    }

    pub(crate) fn to_pdf_object(&self) -> Object {
        let mut items = vec![
            Object::name(DEVICE_N),
            Object::Array(
                self.colorants
                    .iter()
                    .map(|n| Object::Name(n.clone()))
                    .collect(),
            ),
            self.alternate.to_pdf_object(),
            self.tint_transform.to_pdf_object(),
        ];
        if let Some(attributes) = &self.attributes {
            items.push(Object::Dict(attributes.clone()));
        }

        Object::Array(items)
    }
}

/// Parse the alternate color space of a `Separation` or `DeviceN` space.
///
/// `Indexed` and `Pattern` cannot serve as alternates; they have no
/// component-wise conversion the tint output could feed into.
fn parse_alternate(obj: &Object, r: &dyn Resolve, depth: usize) -> Result<ColorSpace> {
    let alternate = parse_nested(obj, r, depth + 1)?;

    if alternate.is_indexed() || alternate.is_pattern() {
        return Err(Error::Classification(
            "the alternate of a tint space must not be Indexed or Pattern".to_string(),
        ));
    }

    Ok(alternate)
}

/// Evaluate a tint transform and convert its output in the alternate space.
///
/// The function's output is clipped to `[0, 1]`. On the image path it is
/// additionally mapped onto the alternate's decode ranges, since the
/// function output is not pre-scaled the way image samples are.
fn tint_to_rgb(
    tint_transform: &Function,
    alternate: &ColorSpace,
    components: &[f32],
    image_path: bool,
) -> Result<[f32; 3]> {
    let evaluated = tint_transform.eval(components)?;

    let expected = alternate.num_components();
    if evaluated.len() != expected {
        return Err(Error::Eval(format!(
            "tint transform produced {} outputs, the alternate space has {expected} components",
            evaluated.len()
        )));
    }

    let mut values = evaluated
        .iter()
        .map(|v| v.clamp(0.0, 1.0))
        .collect::<ColorComponents>();

    if image_path {
        let decode = alternate.decode_array();
        for (idx, value) in values.iter_mut().enumerate() {
            *value = interpolate(*value, 0.0, 1.0, decode[idx * 2], decode[idx * 2 + 1]);
        }
    }

    alternate.kind().to_rgb(&values, false)
}
