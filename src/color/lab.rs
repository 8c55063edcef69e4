//! The CIE `Lab` color space.

use crate::color::calibrated::xyz_to_srgb;
use crate::error::Result;
use crate::object::dict::keys::{BLACK_POINT, LAB, RANGE, WHITE_POINT};
use crate::object::{Dict, Object, Resolve};

const DEFAULT_RANGE: [f32; 4] = [-100.0, 100.0, -100.0, 100.0];

/// A `Lab` color space.
#[derive(Debug, Clone, PartialEq)]
pub struct Lab {
    pub(crate) white_point: [f32; 3],
    pub(crate) black_point: [f32; 3],
    pub(crate) range: [f32; 4],
}

impl Lab {
    pub(crate) fn new(dict: &Dict, r: &dyn Resolve) -> Result<Self> {
        let white_point = dict.get_required::<[f32; 3]>(WHITE_POINT, r)?;
        // The black point has no effect on the conversion, but it is retained
        // so the space serializes back faithfully.
        let black_point = dict.get::<[f32; 3]>(BLACK_POINT, r)?.unwrap_or([0.0; 3]);
        let range = dict.get::<[f32; 4]>(RANGE, r)?.unwrap_or(DEFAULT_RANGE);

        Ok(Self {
            white_point,
            black_point,
            range,
        })
    }

    pub(crate) fn to_rgb(&self, components: &[f32]) -> [f32; 3] {
        // Invert the L*a*b* transform back to XYZ.
        fn g(t: f32) -> f32 {
            if t >= 6.0 / 29.0 {
                t * t * t
            } else {
                (108.0 / 841.0) * (t - 4.0 / 29.0)
            }
        }

        let l = (components[0] + 16.0) / 116.0;
        let m = l + components[1] / 500.0;
        let n = l - components[2] / 200.0;

        let [wx, wy, wz] = self.white_point;

        xyz_to_srgb([wx * g(m), wy * g(l), wz * g(n)])
    }

    pub(crate) fn to_pdf_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, self.white_point.to_vec());
        dict.insert(BLACK_POINT, self.black_point.to_vec());
        dict.insert(RANGE, self.range.to_vec());

        Object::Array(vec![Object::name(LAB), Object::Dict(dict)])
    }
}
