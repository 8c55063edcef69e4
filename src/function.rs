//! Tint-transform functions for `Separation` and `DeviceN` color spaces.
//!
//! The color engine only ever calls [`TintTransform::eval`]; which concrete
//! function sits behind that call is opaque to it. The two closed-form PDF
//! function types (exponential interpolation and stitching) are built in.
//! Sampled (type 0) and PostScript calculator (type 4) functions are full
//! subsystems of their own and can be plugged in through the trait.

use crate::error::{Error, Result};
use crate::object::dict::keys::{
    BOUNDS, C0, C1, DOMAIN, ENCODE, FUNCTION_TYPE, FUNCTIONS, N, RANGE,
};
use crate::object::{Dict, Object, Resolve};
use smallvec::SmallVec;
use std::fmt::Debug;
use std::sync::Arc;

/// A storage for function input and output values.
pub type Values = SmallVec<[f32; 4]>;

/// A function mapping tint values to the components of an alternate color
/// space.
pub trait TintTransform: Debug + Send + Sync {
    /// Evaluate the function with the given input values.
    fn eval(&self, input: &[f32]) -> Result<Values>;
}

/// A cheaply clonable handle to a tint transform.
#[derive(Debug, Clone)]
pub struct Function {
    transform: Arc<dyn TintTransform>,
    object: Object,
}

impl Function {
    /// Create a new function from the given object.
    ///
    /// The object must be (or resolve to) a function dictionary or stream of
    /// type 2 or 3.
    pub fn new(obj: &Object, r: &dyn Resolve) -> Result<Self> {
        let dict = r.resolve(obj).as_dict().ok_or_else(|| Error::Type {
            context: "tint transform".to_string(),
            expected: "function dictionary or stream",
        })?;

        let function_type = dict.get_required::<i64>(FUNCTION_TYPE, r)?;
        let transform: Arc<dyn TintTransform> = match function_type {
            2 => Arc::new(Exponential::new(dict, r)?),
            3 => Arc::new(Stitching::new(dict, r)?),
            _ => {
                return Err(Error::Classification(format!(
                    "unsupported function type {function_type}"
                )));
            }
        };

        Ok(Self {
            transform,
            // Keep the object (possibly an indirect reference) as-is, so
            // serialization reproduces the original container.
            object: obj.clone(),
        })
    }

    /// Create a function from a caller-supplied transform.
    ///
    /// `object` is what [`Function::to_pdf_object`] will render; pass
    /// [`Object::Null`] if the function never needs to be serialized.
    pub fn custom(transform: Arc<dyn TintTransform>, object: Object) -> Self {
        Self { transform, object }
    }

    /// Evaluate the function with the given input values.
    pub fn eval(&self, input: &[f32]) -> Result<Values> {
        self.transform.eval(input)
    }

    /// Return the object this function was created from.
    pub fn to_pdf_object(&self) -> Object {
        self.object.clone()
    }
}

/// Linearly map `x` from `[x_min, x_max]` to `[y_min, y_max]`.
pub fn interpolate(x: f32, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> f32 {
    if x_max == x_min {
        y_min
    } else {
        y_min + (x - x_min) * ((y_max - y_min) / (x_max - x_min))
    }
}

/// A sequence of (min, max) pairs used for clamping inputs and outputs.
#[derive(Debug, Clone)]
struct Clamper(Vec<(f32, f32)>);

impl Clamper {
    fn from_flat(values: &[f32]) -> Self {
        Self(values.chunks_exact(2).map(|c| (c[0], c[1])).collect())
    }

    fn dimension(&self) -> usize {
        self.0.len()
    }

    fn clamp(&self, val: f32, idx: usize) -> f32 {
        let (min, max) = self.0.get(idx).copied().unwrap_or((0.0, 0.0));

        val.clamp(min, max)
    }
}

/// A type 2 (exponential interpolation) function.
#[derive(Debug)]
struct Exponential {
    c0: Values,
    c1: Values,
    n: f32,
    domain: Clamper,
    range: Option<Clamper>,
}

impl Exponential {
    fn new(dict: &Dict, r: &dyn Resolve) -> Result<Self> {
        let domain = Clamper::from_flat(&dict.get_required::<Vec<f32>>(DOMAIN, r)?);
        let range = dict
            .get::<Vec<f32>>(RANGE, r)?
            .map(|v| Clamper::from_flat(&v));
        let c0 = dict
            .get::<Vec<f32>>(C0, r)?
            .map(Values::from_vec)
            .unwrap_or_else(|| Values::from_slice(&[0.0]));
        let c1 = dict
            .get::<Vec<f32>>(C1, r)?
            .map(Values::from_vec)
            .unwrap_or_else(|| Values::from_slice(&[1.0]));
        let n = dict.get_required::<f32>(N, r)?;

        Ok(Self {
            c0,
            c1,
            n,
            domain,
            range,
        })
    }
}

impl TintTransform for Exponential {
    fn eval(&self, input: &[f32]) -> Result<Values> {
        if input.len() != 1 {
            return Err(Error::Eval(format!(
                "exponential function takes 1 input, got {}",
                input.len()
            )));
        }

        let x = self.domain.clamp(input[0], 0);

        let mut out = self
            .c0
            .iter()
            .zip(self.c1.iter())
            .map(|(c0, c1)| *c0 + x.powf(self.n) * (*c1 - *c0))
            .collect::<Values>();

        if let Some(range) = &self.range {
            for (idx, val) in out.iter_mut().enumerate() {
                *val = range.clamp(*val, idx);
            }
        }

        Ok(out)
    }
}

/// A type 3 (stitching) function.
#[derive(Debug)]
struct Stitching {
    functions: Vec<Function>,
    bounds: Vec<f32>,
    encode: Vec<(f32, f32)>,
    domain: (f32, f32),
    range: Option<Clamper>,
}

impl Stitching {
    fn new(dict: &Dict, r: &dyn Resolve) -> Result<Self> {
        let domain_values = dict.get_required::<Vec<f32>>(DOMAIN, r)?;
        if domain_values.len() < 2 {
            return Err(Error::Arity {
                context: "stitching function domain",
                expected: 2,
                found: domain_values.len(),
            });
        }
        let domain = (domain_values[0], domain_values[1]);

        let functions_obj = dict.get_required::<Object>(FUNCTIONS, r)?;
        let functions = functions_obj
            .as_array()
            .ok_or_else(|| Error::key_type(FUNCTIONS, "array"))?
            .iter()
            .map(|o| Function::new(o, r))
            .collect::<Result<Vec<_>>>()?;

        // Add a small delta so that the outer intervals are closed.
        let mut bounds = vec![domain.0 - 0.0001];
        if let Some(declared) = dict.get::<Vec<f32>>(BOUNDS, r)? {
            bounds.extend(declared);
        }
        bounds.push(domain.1 + 0.0001);

        let encode = Clamper::from_flat(&dict.get_required::<Vec<f32>>(ENCODE, r)?).0;
        let range = dict
            .get::<Vec<f32>>(RANGE, r)?
            .map(|v| Clamper::from_flat(&v));

        Ok(Self {
            functions,
            bounds,
            encode,
            domain,
            range,
        })
    }

    fn find_interval(&self, x: f32) -> Option<usize> {
        for i in 0..self.bounds.len().saturating_sub(1) {
            if x >= self.bounds[i] && x < self.bounds[i + 1] {
                return Some(i);
            }
        }

        None
    }
}

impl TintTransform for Stitching {
    fn eval(&self, input: &[f32]) -> Result<Values> {
        if input.len() != 1 {
            return Err(Error::Eval(format!(
                "stitching function takes 1 input, got {}",
                input.len()
            )));
        }

        let x = input[0].clamp(self.domain.0, self.domain.1);
        let index = self
            .find_interval(x)
            .ok_or_else(|| Error::Eval("input outside of all subdomains".to_string()))?;

        let low = self.bounds[index];
        let high = self.bounds[index + 1];
        let (e0, e1) = self
            .encode
            .get(index)
            .copied()
            .ok_or_else(|| Error::Eval("missing encode pair".to_string()))?;
        let function = self
            .functions
            .get(index)
            .ok_or_else(|| Error::Eval("missing subfunction".to_string()))?;

        let encoded = interpolate(x, low, high, e0, e1);
        let mut out = function.eval(&[encoded])?;

        if let Some(range) = &self.range {
            for (idx, val) in out.iter_mut().enumerate() {
                *val = range.clamp(*val, idx);
            }
        }

        Ok(out)
    }
}
