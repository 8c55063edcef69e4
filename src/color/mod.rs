//! PDF color spaces, colors and conversion to RGB.
//!
//! A color space is classified from a format object by [`parse_colorspace`],
//! validated and fixed at construction, and immutable afterwards. Conversion
//! runs either per color ([`ColorSpace::color_to_rgb`]) or over a whole
//! packed sample buffer ([`ColorSpace::image_to_rgb`]); both apply the same
//! per-space math.

mod calibrated;
mod device;
mod icc;
mod indexed;
mod lab;
mod tint;

pub use calibrated::{CalGray, CalRgb};
pub use icc::IccBased;
pub use indexed::Indexed;
pub use lab::Lab;
pub use tint::{DeviceN, Separation};

use crate::error::{Error, Result};
use crate::function::interpolate;
use crate::image::Image;
use crate::object::dict::keys::*;
use crate::object::{Name, Object, ObjectStore, Ref, Resolve};
use log::warn;
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

/// A storage for the components of colors.
pub type ColorComponents = SmallVec<[f32; 4]>;

/// How deeply color spaces may nest (Indexed bases, alternates, pattern
/// underlying spaces). Legitimate files stay far below this; a chain that
/// reaches it is cyclic or garbage.
const MAX_NESTING_DEPTH: usize = 8;

/// A color value in some color space.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// A plain tuple of component values.
    Components(ColorComponents),
    /// A pattern color: the name of a pattern resource, with component
    /// values in the underlying space if one exists.
    Pattern {
        /// The name of the pattern resource.
        name: Name,
        /// Component values in the underlying color space, if any.
        underlying: Option<ColorComponents>,
    },
}

impl Color {
    /// Create an RGB component color.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::Components(smallvec![r, g, b])
    }

    /// The component values of the color.
    ///
    /// For pattern colors this is the underlying color, or empty if there is
    /// none.
    pub fn components(&self) -> &[f32] {
        match self {
            Self::Components(c) => c,
            Self::Pattern {
                underlying: Some(c),
                ..
            } => c,
            Self::Pattern {
                underlying: None, ..
            } => &[],
        }
    }
}

/// The closed set of color space variants.
#[derive(Debug, Clone)]
pub enum ColorSpaceKind {
    /// The `DeviceGray` color space.
    DeviceGray,
    /// The `DeviceRGB` color space.
    DeviceRgb,
    /// The `DeviceCMYK` color space.
    DeviceCmyk,
    /// A `CalGray` color space.
    CalGray(CalGray),
    /// A `CalRGB` color space.
    CalRgb(CalRgb),
    /// A `Lab` color space.
    Lab(Lab),
    /// An `ICCBased` color space.
    IccBased(IccBased),
    /// An `Indexed` color space.
    Indexed(Indexed),
    /// A `Separation` color space.
    Separation(Separation),
    /// A `DeviceN` color space.
    DeviceN(DeviceN),
    /// The `Pattern` color space, with an optional underlying space.
    Pattern(Pattern),
}

/// The `Pattern` color space.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub(crate) underlying: Option<ColorSpace>,
}

/// A PDF color space.
///
/// Cheap to clone and safe to share across threads; all conversion methods
/// take `&self`.
#[derive(Debug, Clone)]
pub struct ColorSpace {
    kind: Arc<ColorSpaceKind>,
    origin: Option<Ref>,
}

/// Classify a format object into a color space.
///
/// The object must be (or resolve to) a color space name or an array headed
/// by one.
pub fn parse_colorspace(obj: &Object, r: &dyn Resolve) -> Result<ColorSpace> {
    parse_nested(obj, r, 0)
}

pub(crate) fn parse_nested(obj: &Object, r: &dyn Resolve, depth: usize) -> Result<ColorSpace> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::Classification(
            "color space nesting exceeds the supported depth".to_string(),
        ));
    }

    let origin = match obj {
        Object::Reference(origin) => Some(*origin),
        _ => None,
    };

    let kind = match r.resolve(obj) {
        Object::Name(name) => kind_from_name(name)?,
        Object::Array(items) => kind_from_array(items, r, depth)?,
        _ => {
            return Err(Error::Type {
                context: "color space".to_string(),
                expected: "name or array",
            });
        }
    };

    Ok(ColorSpace {
        kind: Arc::new(kind),
        origin,
    })
}

fn kind_from_name(name: &Name) -> Result<ColorSpaceKind> {
    match name.as_bytes() {
        DEVICE_GRAY | G => Ok(ColorSpaceKind::DeviceGray),
        DEVICE_RGB | RGB => Ok(ColorSpaceKind::DeviceRgb),
        DEVICE_CMYK | CMYK | CALCMYK => Ok(ColorSpaceKind::DeviceCmyk),
        PATTERN => Ok(ColorSpaceKind::Pattern(Pattern { underlying: None })),
        _ => {
            warn!("unrecognized color space name: {}", name.as_str());

            Err(Error::Classification(name.as_str().to_string()))
        }
    }
}

fn kind_from_array(items: &[Object], r: &dyn Resolve, depth: usize) -> Result<ColorSpaceKind> {
    let name = items
        .first()
        .map(|o| r.resolve(o))
        .and_then(Object::as_name)
        .ok_or_else(|| Error::Type {
            context: "color space array".to_string(),
            expected: "leading name",
        })?;

    match name.as_bytes() {
        DEVICE_GRAY | G => Ok(ColorSpaceKind::DeviceGray),
        DEVICE_RGB | RGB => Ok(ColorSpaceKind::DeviceRgb),
        DEVICE_CMYK | CMYK | CALCMYK => Ok(ColorSpaceKind::DeviceCmyk),
        CALGRAY => {
            let dict = parameter_dict(items, r, "CalGray color space")?;

            Ok(ColorSpaceKind::CalGray(CalGray::new(&dict, r)?))
        }
        CALRGB => {
            let dict = parameter_dict(items, r, "CalRGB color space")?;

            Ok(ColorSpaceKind::CalRgb(CalRgb::new(&dict, r)?))
        }
        LAB => {
            let dict = parameter_dict(items, r, "Lab color space")?;

            Ok(ColorSpaceKind::Lab(Lab::new(&dict, r)?))
        }
        ICC_BASED => Ok(ColorSpaceKind::IccBased(IccBased::new(items, r, depth)?)),
        INDEXED | I => Ok(ColorSpaceKind::Indexed(Indexed::new(items, r, depth)?)),
        SEPARATION => Ok(ColorSpaceKind::Separation(Separation::new(
            items, r, depth,
        )?)),
        DEVICE_N => Ok(ColorSpaceKind::DeviceN(DeviceN::new(items, r, depth)?)),
        PATTERN => {
            let underlying = items
                .get(1)
                .map(|o| parse_nested(o, r, depth + 1))
                .transpose()?;

            Ok(ColorSpaceKind::Pattern(Pattern { underlying }))
        }
        _ => {
            warn!("unrecognized color space: {}", name.as_str());

            Err(Error::Classification(name.as_str().to_string()))
        }
    }
}

fn parameter_dict(
    items: &[Object],
    r: &dyn Resolve,
    context: &'static str,
) -> Result<crate::object::Dict> {
    items
        .get(1)
        .map(|o| r.resolve(o))
        .and_then(Object::as_dict)
        .cloned()
        .ok_or_else(|| Error::Type {
            context: context.to_string(),
            expected: "parameter dictionary",
        })
}

impl ColorSpace {
    pub(crate) fn from_kind(kind: ColorSpaceKind) -> Self {
        Self {
            kind: Arc::new(kind),
            origin: None,
        }
    }

    /// The `DeviceGray` color space.
    pub fn device_gray() -> Self {
        Self::from_kind(ColorSpaceKind::DeviceGray)
    }

    /// The `DeviceRGB` color space.
    pub fn device_rgb() -> Self {
        Self::from_kind(ColorSpaceKind::DeviceRgb)
    }

    /// The `DeviceCMYK` color space.
    pub fn device_cmyk() -> Self {
        Self::from_kind(ColorSpaceKind::DeviceCmyk)
    }

    /// The `Pattern` color space with an optional underlying space.
    pub fn pattern(underlying: Option<Self>) -> Self {
        Self::from_kind(ColorSpaceKind::Pattern(Pattern { underlying }))
    }

    /// The device color space with the given number of components.
    ///
    /// Must be 1, 3 or 4.
    pub(crate) fn device_for(n: usize) -> Self {
        match n {
            1 => Self::device_gray(),
            3 => Self::device_rgb(),
            4 => Self::device_cmyk(),
            _ => unreachable!("device fallback with {n} components"),
        }
    }

    /// The variant of this color space.
    pub fn kind(&self) -> &ColorSpaceKind {
        &self.kind
    }

    /// The indirect container this color space was parsed from, if any.
    pub fn origin(&self) -> Option<Ref> {
        self.origin
    }

    /// Whether this is the pattern color space.
    pub fn is_pattern(&self) -> bool {
        matches!(self.kind.as_ref(), ColorSpaceKind::Pattern(_))
    }

    /// Whether this is an indexed color space.
    pub fn is_indexed(&self) -> bool {
        matches!(self.kind.as_ref(), ColorSpaceKind::Indexed(_))
    }

    /// Whether painting in this color space produces no visible output (the
    /// `None` colorant of `Separation` and `DeviceN` spaces).
    pub fn is_none(&self) -> bool {
        match self.kind.as_ref() {
            ColorSpaceKind::Separation(s) => s.is_none(),
            ColorSpaceKind::DeviceN(d) => d.is_none(),
            _ => false,
        }
    }

    /// The number of components of the color space.
    ///
    /// A pattern space reports its underlying space's count, or 0.
    pub fn num_components(&self) -> usize {
        match self.kind.as_ref() {
            ColorSpaceKind::DeviceGray => 1,
            ColorSpaceKind::DeviceRgb => 3,
            ColorSpaceKind::DeviceCmyk => 4,
            ColorSpaceKind::CalGray(_) => 1,
            ColorSpaceKind::CalRgb(_) => 3,
            ColorSpaceKind::Lab(_) => 3,
            ColorSpaceKind::IccBased(icc) => icc.n,
            ColorSpaceKind::Indexed(_) => 1,
            ColorSpaceKind::Separation(_) => 1,
            ColorSpaceKind::DeviceN(d) => d.colorants.len(),
            ColorSpaceKind::Pattern(p) => p
                .underlying
                .as_ref()
                .map(Self::num_components)
                .unwrap_or(0),
        }
    }

    /// The default decode array of the color space: a (min, max) pair per
    /// component. Empty for a bare pattern space.
    pub fn decode_array(&self) -> Vec<f32> {
        match self.kind.as_ref() {
            ColorSpaceKind::DeviceGray | ColorSpaceKind::CalGray(_) => vec![0.0, 1.0],
            ColorSpaceKind::DeviceRgb | ColorSpaceKind::CalRgb(_) => [0.0, 1.0].repeat(3),
            ColorSpaceKind::DeviceCmyk => [0.0, 1.0].repeat(4),
            ColorSpaceKind::Lab(l) => vec![
                0.0,
                100.0,
                l.range[0],
                l.range[1],
                l.range[2],
                l.range[3],
            ],
            ColorSpaceKind::IccBased(icc) => icc.decode_array(),
            ColorSpaceKind::Indexed(i) => vec![0.0, f32::from(i.hival)],
            ColorSpaceKind::Separation(_) => vec![0.0, 1.0],
            ColorSpaceKind::DeviceN(d) => [0.0, 1.0].repeat(d.colorants.len()),
            ColorSpaceKind::Pattern(_) => vec![],
        }
    }

    /// The initial color of the color space, as set when a content stream
    /// selects it.
    pub fn initial_color(&self) -> ColorComponents {
        match self.kind.as_ref() {
            ColorSpaceKind::DeviceGray | ColorSpaceKind::CalGray(_) => smallvec![0.0],
            ColorSpaceKind::DeviceRgb | ColorSpaceKind::CalRgb(_) | ColorSpaceKind::Lab(_) => {
                smallvec![0.0, 0.0, 0.0]
            }
            ColorSpaceKind::DeviceCmyk => smallvec![0.0, 0.0, 0.0, 1.0],
            ColorSpaceKind::IccBased(icc) => icc.working.initial_color(),
            ColorSpaceKind::Indexed(_) => smallvec![0.0],
            ColorSpaceKind::Separation(_) => smallvec![1.0],
            ColorSpaceKind::DeviceN(d) => smallvec![1.0; d.colorants.len()],
            ColorSpaceKind::Pattern(p) => p
                .underlying
                .as_ref()
                .map(Self::initial_color)
                .unwrap_or_default(),
        }
    }

    /// Build a color from component values, validating arity and ranges.
    pub fn color_from_floats(&self, values: &[f32]) -> Result<Color> {
        if self.is_pattern() {
            return Err(Error::Type {
                context: "pattern color".to_string(),
                expected: "a trailing pattern name (see color_from_objects)",
            });
        }

        let expected = self.num_components();
        if values.len() != expected {
            return Err(Error::Arity {
                context: "color components",
                expected,
                found: values.len(),
            });
        }

        let decode = self.decode_array();
        for (idx, value) in values.iter().enumerate() {
            let min = decode[idx * 2];
            let max = decode[idx * 2 + 1];

            if !(*value >= min && *value <= max) {
                return Err(Error::Range {
                    context: "color component",
                    value: *value,
                    min,
                    max,
                });
            }
        }

        Ok(Color::Components(ColorComponents::from_slice(values)))
    }

    /// Build a color from format objects, resolving references and
    /// extracting numeric values.
    ///
    /// For the pattern space, the trailing object must be the name of the
    /// pattern resource; leading numeric values are validated against the
    /// underlying space.
    pub fn color_from_objects(&self, objects: &[Object], r: &dyn Resolve) -> Result<Color> {
        if let ColorSpaceKind::Pattern(pattern) = self.kind.as_ref() {
            let (last, leading) = objects.split_last().ok_or(Error::Arity {
                context: "pattern color operands",
                expected: 1,
                found: 0,
            })?;

            let name = r
                .resolve(last)
                .as_name()
                .cloned()
                .ok_or_else(|| Error::Type {
                    context: "pattern color".to_string(),
                    expected: "trailing pattern name",
                })?;

            let underlying = if leading.is_empty() {
                None
            } else {
                let space = pattern.underlying.as_ref().ok_or_else(|| {
                    Error::Classification(
                        "pattern color with components but no underlying space".to_string(),
                    )
                })?;

                match space.color_from_floats(&extract_floats(leading, r)?)? {
                    Color::Components(c) => Some(c),
                    Color::Pattern { .. } => {
                        return Err(Error::Classification(
                            "pattern underlying space must not be a pattern".to_string(),
                        ));
                    }
                }
            };

            return Ok(Color::Pattern { name, underlying });
        }

        self.color_from_floats(&extract_floats(objects, r)?)
    }

    /// Convert a color of this space to RGB.
    ///
    /// A pattern color without an underlying color is returned unchanged.
    pub fn color_to_rgb(&self, color: &Color) -> Result<Color> {
        match (self.kind.as_ref(), color) {
            (ColorSpaceKind::Pattern(_), Color::Pattern {
                underlying: None, ..
            }) => Ok(color.clone()),
            (ColorSpaceKind::Pattern(pattern), _) => {
                let space = pattern.underlying.as_ref().ok_or_else(|| {
                    Error::Classification(
                        "pattern color space has no underlying space".to_string(),
                    )
                })?;

                space.color_to_rgb(&Color::Components(ColorComponents::from_slice(
                    color.components(),
                )))
            }
            (_, Color::Pattern { .. }) => Err(Error::Type {
                context: "color".to_string(),
                expected: "a component color for a non-pattern space",
            }),
            (kind, Color::Components(components)) => {
                let expected = self.num_components();
                if components.len() != expected {
                    return Err(Error::Arity {
                        context: "color components",
                        expected,
                        found: components.len(),
                    });
                }

                let [r, g, b] = kind.to_rgb(components, false)?;

                Ok(Color::rgb(r, g, b))
            }
        }
    }

    /// Convert a packed sample buffer to an 8-bit RGB buffer.
    ///
    /// Samples are normalized to the declared component ranges using the
    /// image's decode array if it has the expected length, the color space's
    /// default decode array otherwise. Alpha data is carried through
    /// unchanged. `DeviceRGB` buffers (and `ICCBased` buffers falling back
    /// to it) are returned as-is.
    pub fn image_to_rgb(&self, image: &Image) -> Result<Image> {
        match self.kind.as_ref() {
            ColorSpaceKind::Pattern(_) => Err(Error::Classification(
                "the pattern color space cannot convert images".to_string(),
            )),
            ColorSpaceKind::DeviceRgb => Ok(image.clone()),
            ColorSpaceKind::IccBased(icc)
                if matches!(icc.working.kind.as_ref(), ColorSpaceKind::DeviceRgb) =>
            {
                Ok(image.clone())
            }
            kind => self.convert_image(kind, image),
        }
    }

    fn convert_image(&self, kind: &ColorSpaceKind, image: &Image) -> Result<Image> {
        let n = self.num_components();
        let expected = image.width as usize * image.height as usize * n;

        let samples = image.samples();
        if samples.len() < expected || n == 0 {
            return Err(Error::Arity {
                context: "image samples",
                expected,
                found: samples.len(),
            });
        }

        let max = image.max_value() as f32;

        let default_decode;
        let decode = match &image.decode {
            Some(decode) if decode.len() == 2 * n => decode,
            _ => {
                // Indexed samples already are palette indices, so their
                // default decode is the identity on raw values, not
                // [0, hival].
                default_decode = match kind {
                    ColorSpaceKind::Indexed(_) => vec![0.0, max],
                    _ => self.decode_array(),
                };
                &default_decode
            }
        };
        let mut out = Vec::with_capacity(image.width as usize * image.height as usize * 3);
        let mut values: ColorComponents = smallvec![0.0; n];

        for chunk in samples[..expected].chunks_exact(n) {
            for (idx, sample) in chunk.iter().enumerate() {
                values[idx] = interpolate(
                    *sample as f32,
                    0.0,
                    max,
                    decode[idx * 2],
                    decode[idx * 2 + 1],
                );
            }

            let [r, g, b] = kind.to_rgb(&values, true)?;
            out.push((r * 255.0 + 0.5) as u32);
            out.push((g * 255.0 + 0.5) as u32);
            out.push((b * 255.0 + 0.5) as u32);
        }

        Ok(Image::rgb8(
            image.width,
            image.height,
            &out,
            image.alpha.clone(),
        ))
    }

    /// Render the color space back to a format object.
    pub fn to_pdf_object(&self) -> Object {
        match self.kind.as_ref() {
            ColorSpaceKind::DeviceGray => Object::name(DEVICE_GRAY),
            ColorSpaceKind::DeviceRgb => Object::name(DEVICE_RGB),
            ColorSpaceKind::DeviceCmyk => Object::name(DEVICE_CMYK),
            ColorSpaceKind::CalGray(c) => c.to_pdf_object(),
            ColorSpaceKind::CalRgb(c) => c.to_pdf_object(),
            ColorSpaceKind::Lab(l) => l.to_pdf_object(),
            ColorSpaceKind::IccBased(icc) => icc.to_pdf_object(),
            ColorSpaceKind::Indexed(i) => i.to_pdf_object(),
            ColorSpaceKind::Separation(s) => s.to_pdf_object(),
            ColorSpaceKind::DeviceN(d) => d.to_pdf_object(),
            ColorSpaceKind::Pattern(p) => match &p.underlying {
                Some(underlying) => {
                    Object::Array(vec![Object::name(PATTERN), underlying.to_pdf_object()])
                }
                None => Object::name(PATTERN),
            },
        }
    }

    /// Serialize the color space into the store.
    ///
    /// If the space was parsed from an indirect container, the rendered
    /// object overwrites that same container and a reference to it is
    /// returned; otherwise the direct object is returned.
    pub fn write_to(&self, store: &mut ObjectStore) -> Object {
        let body = self.to_pdf_object();

        match self.origin {
            Some(origin) => {
                store.insert(origin, body);

                Object::Reference(origin)
            }
            None => body,
        }
    }
}

impl ColorSpaceKind {
    /// Convert one tuple of component values to RGB, clipped to `[0, 1]`.
    ///
    /// `image_path` selects the bulk-conversion behavior for the spaces
    /// whose scalar and image semantics differ (tint decode mapping).
    pub(crate) fn to_rgb(&self, components: &[f32], image_path: bool) -> Result<[f32; 3]> {
        let [r, g, b] = match self {
            Self::DeviceGray => device::gray_to_rgb(components[0]),
            Self::DeviceRgb => [components[0], components[1], components[2]],
            Self::DeviceCmyk => {
                device::cmyk_to_rgb(components[0], components[1], components[2], components[3])
            }
            Self::CalGray(c) => c.to_rgb(components),
            Self::CalRgb(c) => c.to_rgb(components),
            Self::Lab(l) => l.to_rgb(components),
            Self::IccBased(icc) => icc.working.kind.to_rgb(components, image_path)?,
            Self::Indexed(i) => {
                let index = components[0].max(0.0).floor() as usize;

                i.base.kind.to_rgb(&i.entry(index), false)?
            }
            Self::Separation(s) => s.to_rgb(components, image_path)?,
            Self::DeviceN(d) => d.to_rgb(components, image_path)?,
            Self::Pattern(_) => {
                return Err(Error::Classification(
                    "the pattern color space has no component conversion".to_string(),
                ));
            }
        };

        Ok([r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)])
    }
}

fn extract_floats(objects: &[Object], r: &dyn Resolve) -> Result<Vec<f32>> {
    objects
        .iter()
        .map(|o| {
            r.resolve(o).as_f32().ok_or_else(|| Error::Type {
                context: "color component".to_string(),
                expected: "number",
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Dict, NoResolve, Stream};
    use approx::assert_relative_eq;

    fn parse(obj: &Object) -> ColorSpace {
        parse_colorspace(obj, &NoResolve).unwrap()
    }

    fn identity_tint() -> Object {
        let mut dict = Dict::new();
        dict.insert(FUNCTION_TYPE, 2_i64);
        dict.insert(DOMAIN, vec![0.0_f32, 1.0]);
        dict.insert(C0, vec![0.0_f32]);
        dict.insert(C1, vec![1.0_f32]);
        dict.insert(N, 1.0_f32);

        Object::Dict(dict)
    }

    fn separation(colorant: &str) -> Object {
        Object::Array(vec![
            Object::name(SEPARATION),
            Object::name(colorant),
            Object::name(DEVICE_GRAY),
            identity_tint(),
        ])
    }

    fn icc(n: i64, alternate: Option<Object>) -> Object {
        let mut dict = Dict::new();
        dict.insert(N, n);
        if let Some(alternate) = alternate {
            dict.insert(ALTERNATE, alternate);
        }

        Object::Array(vec![
            Object::name(ICC_BASED),
            Object::Stream(Stream::new(dict, vec![0; 8])),
        ])
    }

    fn rgb_of(space: &ColorSpace, components: &[f32]) -> [f32; 3] {
        let color = space.color_from_floats(components).unwrap();

        match space.color_to_rgb(&color).unwrap() {
            Color::Components(c) => [c[0], c[1], c[2]],
            Color::Pattern { .. } => unreachable!(),
        }
    }

    #[test]
    fn device_names_and_abbreviations() {
        for (name, n) in [
            (DEVICE_GRAY, 1),
            (G, 1),
            (DEVICE_RGB, 3),
            (RGB, 3),
            (DEVICE_CMYK, 4),
            (CMYK, 4),
            (CALCMYK, 4),
        ] {
            let space = parse(&Object::name(name));
            assert_eq!(space.num_components(), n);
        }
    }

    #[test]
    fn unknown_name_fails_classification() {
        let err = parse_colorspace(&Object::name("Separationy"), &NoResolve).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn component_arity_is_enforced() {
        let space = ColorSpace::device_rgb();
        let err = space.color_from_floats(&[1.0]).unwrap_err();

        assert!(matches!(
            err,
            Error::Arity {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn lab_component_ranges_are_enforced() {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, vec![0.9505_f32, 1.0, 1.089]);
        let space = parse(&Object::Array(vec![
            Object::name(LAB),
            Object::Dict(dict),
        ]));

        assert!(space.color_from_floats(&[50.0, 0.0, 0.0]).is_ok());
        assert!(space.color_from_floats(&[50.0, -100.0, 100.0]).is_ok());

        let err = space.color_from_floats(&[150.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn initial_colors() {
        assert_eq!(
            ColorSpace::device_cmyk().initial_color().as_slice(),
            &[0.0, 0.0, 0.0, 1.0]
        );
        assert_eq!(ColorSpace::device_gray().initial_color().as_slice(), &[0.0]);
        assert_eq!(parse(&separation("Spot")).initial_color().as_slice(), &[1.0]);
    }

    #[test]
    fn separation_with_identity_tint_behaves_like_gray() {
        let space = parse(&separation("Spot"));
        assert!(!space.is_none());

        assert_eq!(rgb_of(&space, &[0.25]), [0.25, 0.25, 0.25]);
    }

    #[test]
    fn none_colorant_is_detected() {
        assert!(parse(&separation("None")).is_none());
        assert!(!parse(&separation("Spot")).is_none());
    }

    #[test]
    fn device_n_requires_colorants() {
        let obj = Object::Array(vec![
            Object::name(DEVICE_N),
            Object::Array(vec![]),
            Object::name(DEVICE_GRAY),
            identity_tint(),
        ]);

        let err = parse_colorspace(&obj, &NoResolve).unwrap_err();
        assert!(matches!(err, Error::Arity { .. }));
    }

    #[test]
    fn indexed_lookup_and_clamping() {
        // Two complete entries; hival claims four.
        let obj = Object::Array(vec![
            Object::name(INDEXED),
            Object::name(DEVICE_RGB),
            Object::Integer(3),
            Object::String(vec![255, 0, 0, 0, 255, 0]),
        ]);
        let space = parse(&obj);

        assert_eq!(space.num_components(), 1);
        assert!(space.is_indexed());
        assert_eq!(space.decode_array(), vec![0.0, 3.0]);

        assert_eq!(rgb_of(&space, &[0.0]), [1.0, 0.0, 0.0]);
        assert_eq!(rgb_of(&space, &[1.0]), [0.0, 1.0, 0.0]);
        // Past the table: clamped to the last complete entry.
        assert_eq!(rgb_of(&space, &[3.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn indexed_base_must_not_be_indexed_or_pattern() {
        for base in [
            Object::Array(vec![
                Object::name(INDEXED),
                Object::name(DEVICE_GRAY),
                Object::Integer(0),
                Object::String(vec![0]),
            ]),
            Object::name(PATTERN),
        ] {
            let obj = Object::Array(vec![
                Object::name(INDEXED),
                base,
                Object::Integer(0),
                Object::String(vec![0, 0, 0]),
            ]);

            let err = parse_colorspace(&obj, &NoResolve).unwrap_err();
            assert!(matches!(err, Error::Classification(_)));
        }
    }

    #[test]
    fn icc_without_alternate_falls_back_to_device() {
        let space = parse(&icc(4, None));

        assert_eq!(space.num_components(), 4);
        assert_eq!(rgb_of(&space, &[0.0, 0.0, 0.0, 1.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn icc_alternate_arity_must_match() {
        let err =
            parse_colorspace(&icc(4, Some(Object::name(DEVICE_RGB))), &NoResolve).unwrap_err();
        assert!(matches!(err, Error::Arity { .. }));
    }

    #[test]
    fn rgb_image_passes_through_unchanged() {
        let data = vec![10, 20, 30, 40, 50, 60];
        let image = Image::new(2, 1, 8, 3, data.clone());

        for space in [ColorSpace::device_rgb(), parse(&icc(3, None))] {
            let out = space.image_to_rgb(&image).unwrap();
            assert_eq!(out.data, data);
        }
    }

    #[test]
    fn image_and_scalar_conversion_agree() {
        let space = ColorSpace::device_cmyk();
        let data = vec![0, 0, 0, 255, 128, 64, 0, 0];
        let image = Image::new(2, 1, 8, 4, data.clone());

        let out = space.image_to_rgb(&image).unwrap();

        for (pixel, out) in data.chunks_exact(4).zip(out.data.chunks_exact(3)) {
            let components = pixel
                .iter()
                .map(|&b| f32::from(b) / 255.0)
                .collect::<Vec<_>>();
            let [r, g, b] = rgb_of(&space, &components);

            assert_eq!(out[0], (r * 255.0 + 0.5) as u8);
            assert_eq!(out[1], (g * 255.0 + 0.5) as u8);
            assert_eq!(out[2], (b * 255.0 + 0.5) as u8);
        }
    }

    #[test]
    fn image_decode_override_inverts_gray() {
        let mut image = Image::new(2, 1, 8, 1, vec![0, 255]);
        image.decode = Some(vec![1.0, 0.0]);

        let out = ColorSpace::device_gray().image_to_rgb(&image).unwrap();
        assert_eq!(out.data, vec![255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn image_sample_shortfall_fails() {
        let image = Image::new(2, 2, 8, 1, vec![0; 2]);

        let err = ColorSpace::device_gray().image_to_rgb(&image).unwrap_err();
        assert!(matches!(err, Error::Arity { .. }));
    }

    #[test]
    fn image_alpha_is_carried_through() {
        let mut image = Image::new(1, 1, 8, 1, vec![128]);
        image.alpha = Some(vec![7]);

        let out = ColorSpace::device_gray().image_to_rgb(&image).unwrap();
        assert_eq!(out.alpha, Some(vec![7]));
    }

    #[test]
    fn indexed_image_uses_palette() {
        let obj = Object::Array(vec![
            Object::name(INDEXED),
            Object::name(DEVICE_RGB),
            Object::Integer(1),
            Object::String(vec![255, 0, 0, 0, 0, 255]),
        ]);
        let space = parse(&obj);

        let image = Image::new(2, 1, 1, 1, vec![0b0100_0000]);
        let out = space.image_to_rgb(&image).unwrap();

        assert_eq!(out.data, vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn indexed_image_samples_are_raw_indices() {
        // A palette much smaller than the sample maximum: raw values must
        // address the palette directly instead of being scaled to hival.
        let palette = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let obj = Object::Array(vec![
            Object::name(INDEXED),
            Object::name(DEVICE_RGB),
            Object::Integer(3),
            Object::String(palette.clone()),
        ]);
        let space = parse(&obj);

        let image = Image::new(4, 1, 8, 1, vec![0, 1, 2, 3]);
        let out = space.image_to_rgb(&image).unwrap();

        assert_eq!(out.data, palette);
    }

    #[test]
    fn tint_alternate_must_not_be_indexed_or_pattern() {
        let obj = Object::Array(vec![
            Object::name(SEPARATION),
            Object::name("Spot"),
            Object::Array(vec![Object::name(PATTERN), Object::name(DEVICE_RGB)]),
            identity_tint(),
        ]);
        let err = parse_colorspace(&obj, &NoResolve).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));

        let obj = Object::Array(vec![
            Object::name(DEVICE_N),
            Object::Array(vec![Object::name("Spot")]),
            Object::Array(vec![
                Object::name(INDEXED),
                Object::name(DEVICE_GRAY),
                Object::Integer(0),
                Object::String(vec![0]),
            ]),
            identity_tint(),
        ]);
        let err = parse_colorspace(&obj, &NoResolve).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn pattern_colors() {
        let bare = ColorSpace::pattern(None);
        assert!(bare.is_pattern());
        assert_eq!(bare.num_components(), 0);

        let color = bare
            .color_from_objects(&[Object::name("P1")], &NoResolve)
            .unwrap();
        assert!(matches!(
            &color,
            Color::Pattern {
                underlying: None,
                ..
            }
        ));
        // Without an underlying color there is nothing to convert.
        assert_eq!(bare.color_to_rgb(&color).unwrap(), color);

        let underlying = ColorSpace::pattern(Some(ColorSpace::device_rgb()));
        let color = underlying
            .color_from_objects(
                &[
                    Object::Real(1.0),
                    Object::Real(0.0),
                    Object::Real(0.5),
                    Object::name("P1"),
                ],
                &NoResolve,
            )
            .unwrap();
        assert_eq!(color.components(), &[1.0, 0.0, 0.5]);
        assert_eq!(
            underlying.color_to_rgb(&color).unwrap(),
            Color::rgb(1.0, 0.0, 0.5)
        );
    }

    #[test]
    fn pattern_images_are_rejected() {
        let image = Image::new(1, 1, 8, 1, vec![0]);

        let err = ColorSpace::pattern(None).image_to_rgb(&image).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut store = ObjectStore::new();
        let r = Ref::new(1, 0);
        store.insert(
            r,
            Object::Array(vec![
                Object::name(INDEXED),
                Object::Reference(r),
                Object::Integer(0),
                Object::String(vec![0]),
            ]),
        );

        let err = parse_colorspace(&Object::Reference(r), &store).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn round_trips_preserve_conversion() {
        let mut cal = Dict::new();
        cal.insert(WHITE_POINT, vec![0.9505_f32, 1.0, 1.089]);
        cal.insert(GAMMA, vec![2.2_f32, 2.2, 2.2]);

        let cases: Vec<(Object, Vec<f32>)> = vec![
            (separation("Spot"), vec![0.7]),
            (icc(4, Some(Object::name(DEVICE_CMYK))), vec![0.1, 0.2, 0.3, 0.4]),
            (
                Object::Array(vec![Object::name(CALRGB), Object::Dict(cal)]),
                vec![0.5, 0.25, 0.75],
            ),
            (
                Object::Array(vec![
                    Object::name(INDEXED),
                    Object::name(DEVICE_GRAY),
                    Object::Integer(2),
                    Object::String(vec![0, 128, 255]),
                ]),
                vec![1.0],
            ),
        ];

        for (obj, components) in cases {
            let space = parse(&obj);
            let reparsed = parse(&space.to_pdf_object());

            let [r0, g0, b0] = rgb_of(&space, &components);
            let [r1, g1, b1] = rgb_of(&reparsed, &components);
            assert_relative_eq!(r0, r1);
            assert_relative_eq!(g0, g1);
            assert_relative_eq!(b0, b1);
        }
    }

    #[test]
    fn write_to_reuses_the_original_container() {
        let mut store = ObjectStore::new();
        let r = Ref::new(4, 0);
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, vec![0.9505_f32, 1.0, 1.089]);
        store.insert(
            r,
            Object::Array(vec![Object::name(CALGRAY), Object::Dict(dict)]),
        );

        let space = parse_colorspace(&Object::Reference(r), &store).unwrap();
        assert_eq!(space.origin(), Some(r));

        let out = space.write_to(&mut store);
        assert_eq!(out, Object::Reference(r));
        assert_eq!(store.lookup(r), Some(&space.to_pdf_object()));

        // A direct space serializes in place.
        let direct = ColorSpace::device_rgb();
        assert_eq!(direct.origin(), None);
        assert_eq!(direct.write_to(&mut store), Object::name(DEVICE_RGB));
    }
}
