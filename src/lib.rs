/*!
A color engine for PDF files.

This crate classifies PDF color space descriptors into typed color spaces,
builds and validates colors in them, and converts single colors as well as
packed image buffers to 8-bit RGB. All of the color space families of the
PDF reference are covered: the device spaces, the CIE-based `CalGray`,
`CalRGB` and `Lab` spaces, `ICCBased` spaces (via their alternate space),
and the special `Indexed`, `Separation`, `DeviceN` and `Pattern` spaces.

A color space is parsed once with [`parse_colorspace`] and immutable
afterwards. Descriptors may reach into other objects through indirect
references, so parsing goes through a [`Resolve`](object::Resolve)
implementation; pass [`NoResolve`](object::NoResolve) for fully direct
objects.

```
use tincture::object::{NoResolve, Object};
use tincture::parse_colorspace;

let space = parse_colorspace(&Object::name("DeviceCMYK"), &NoResolve)?;
let color = space.color_from_floats(&[0.0, 0.0, 0.0, 1.0])?;
let rgb = space.color_to_rgb(&color)?;

assert_eq!(rgb.components(), &[0.0, 0.0, 0.0]);
# Ok::<(), tincture::Error>(())
```

Conversion is best-effort in exactly two documented places (short `Indexed`
lookup tables and `ICCBased` streams without an alternate), both reported
through the [`log`] crate. Everything else that is malformed fails with a
descriptive [`Error`].
*/

pub mod color;
mod error;
pub mod function;
pub mod image;
pub mod object;

pub use color::{Color, ColorComponents, ColorSpace, ColorSpaceKind, parse_colorspace};
pub use error::{Error, Result};
