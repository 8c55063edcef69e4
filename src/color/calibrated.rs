//! The CIE-based `CalGray` and `CalRGB` color spaces.

use crate::error::Result;
use crate::object::dict::keys::{BLACK_POINT, CALGRAY, CALRGB, GAMMA, MATRIX, WHITE_POINT};
use crate::object::{Dict, Object, Resolve};

/// The linear XYZ to sRGB matrix (D65 reference white), row-major.
const XYZ_TO_SRGB: [f32; 9] = [
    3.240479, -1.537150, -0.498535, -0.969256, 1.875992, 0.041556, 0.055648, -0.204043, 1.057311,
];

const IDENTITY_MATRIX: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Apply the XYZ to sRGB matrix and clip the result to `[0, 1]`.
pub(crate) fn xyz_to_srgb(xyz: [f32; 3]) -> [f32; 3] {
    let [x, y, z] = xyz;
    let m = &XYZ_TO_SRGB;

    [
        (m[0] * x + m[1] * y + m[2] * z).clamp(0.0, 1.0),
        (m[3] * x + m[4] * y + m[5] * z).clamp(0.0, 1.0),
        (m[6] * x + m[7] * y + m[8] * z).clamp(0.0, 1.0),
    ]
}

/// A `CalGray` color space.
#[derive(Debug, Clone, PartialEq)]
pub struct CalGray {
    pub(crate) white_point: [f32; 3],
    pub(crate) black_point: [f32; 3],
    pub(crate) gamma: f32,
}

impl CalGray {
    pub(crate) fn new(dict: &Dict, r: &dyn Resolve) -> Result<Self> {
        let white_point = dict.get_required::<[f32; 3]>(WHITE_POINT, r)?;
        let black_point = dict.get::<[f32; 3]>(BLACK_POINT, r)?.unwrap_or([0.0; 3]);
        let gamma = dict.get::<f32>(GAMMA, r)?.unwrap_or(1.0);

        Ok(Self {
            white_point,
            black_point,
            gamma,
        })
    }

    pub(crate) fn to_rgb(&self, components: &[f32]) -> [f32; 3] {
        let ag = components[0].powf(self.gamma);
        let [wx, wy, wz] = self.white_point;

        xyz_to_srgb([wx * ag, wy * ag, wz * ag])
    }

    pub(crate) fn to_pdf_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, self.white_point.to_vec());
        dict.insert(BLACK_POINT, self.black_point.to_vec());
        dict.insert(GAMMA, self.gamma);

        Object::Array(vec![Object::name(CALGRAY), Object::Dict(dict)])
    }
}

/// A `CalRGB` color space.
#[derive(Debug, Clone, PartialEq)]
pub struct CalRgb {
    pub(crate) white_point: [f32; 3],
    pub(crate) black_point: [f32; 3],
    pub(crate) gamma: [f32; 3],
    pub(crate) matrix: [f32; 9],
}

impl CalRgb {
    pub(crate) fn new(dict: &Dict, r: &dyn Resolve) -> Result<Self> {
        let white_point = dict.get_required::<[f32; 3]>(WHITE_POINT, r)?;
        let black_point = dict.get::<[f32; 3]>(BLACK_POINT, r)?.unwrap_or([0.0; 3]);
        let gamma = dict.get::<[f32; 3]>(GAMMA, r)?.unwrap_or([1.0; 3]);
        let matrix = dict.get::<[f32; 9]>(MATRIX, r)?.unwrap_or(IDENTITY_MATRIX);

        Ok(Self {
            white_point,
            black_point,
            gamma,
            matrix,
        })
    }

    pub(crate) fn to_rgb(&self, components: &[f32]) -> [f32; 3] {
        let [ga, gb, gc] = self.gamma;
        let a = components[0].powf(ga);
        let b = components[1].powf(gb);
        let c = components[2].powf(gc);

        // The matrix is stored column-wise: [Xa Ya Za Xb Yb Zb Xc Yc Zc].
        let m = &self.matrix;
        let x = m[0] * a + m[3] * b + m[6] * c;
        let y = m[1] * a + m[4] * b + m[7] * c;
        let z = m[2] * a + m[5] * b + m[8] * c;

        xyz_to_srgb([x, y, z])
    }

    pub(crate) fn to_pdf_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, self.white_point.to_vec());
        dict.insert(BLACK_POINT, self.black_point.to_vec());
        dict.insert(GAMMA, self.gamma.to_vec());
        dict.insert(MATRIX, self.matrix.to_vec());

        Object::Array(vec![Object::name(CALRGB), Object::Dict(dict)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::NoResolve;
    use approx::assert_relative_eq;

    const D65: [f32; 3] = [0.9505, 1.0, 1.089];

    fn cal_gray_dict(gamma: Option<f32>) -> Dict {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, D65.to_vec());
        if let Some(gamma) = gamma {
            dict.insert(GAMMA, gamma);
        }

        dict
    }

    #[test]
    fn cal_gray_defaults() {
        let cs = CalGray::new(&cal_gray_dict(None), &NoResolve).unwrap();

        assert_eq!(cs.gamma, 1.0);
        assert_eq!(cs.black_point, [0.0; 3]);
    }

    #[test]
    fn cal_gray_missing_white_point() {
        assert!(CalGray::new(&Dict::new(), &NoResolve).is_err());
    }

    #[test]
    fn cal_gray_black_stays_black() {
        let cs = CalGray::new(&cal_gray_dict(Some(2.2)), &NoResolve).unwrap();

        assert_eq!(cs.to_rgb(&[0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn cal_gray_white_is_white() {
        let cs = CalGray::new(&cal_gray_dict(Some(2.2)), &NoResolve).unwrap();

        let [r, g, b] = cs.to_rgb(&[1.0]);
        assert_relative_eq!(r, 1.0, epsilon = 5e-3);
        assert_relative_eq!(g, 1.0, epsilon = 5e-3);
        assert_relative_eq!(b, 1.0, epsilon = 5e-3);
    }

    #[test]
    fn cal_rgb_identity_matrix_white() {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, D65.to_vec());
        let cs = CalRgb::new(&dict, &NoResolve).unwrap();

        let [r, g, b] = cs.to_rgb(&[1.0, 1.0, 1.0]);
        let expected = xyz_to_srgb([1.0, 1.0, 1.0]);
        assert_relative_eq!(r, expected[0], epsilon = 1e-6);
        assert_relative_eq!(g, expected[1], epsilon = 1e-6);
        assert_relative_eq!(b, expected[2], epsilon = 1e-6);
    }

    #[test]
    fn cal_rgb_rejects_short_matrix() {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, D65.to_vec());
        dict.insert(MATRIX, vec![1.0_f32, 0.0, 0.0]);

        assert!(CalRgb::new(&dict, &NoResolve).is_err());
    }
}
