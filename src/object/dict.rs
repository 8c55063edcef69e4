//! PDF dictionary objects.

use crate::error::{Error, Result};
use crate::object::name::Name;
use crate::object::{FromObject, Object, Resolve};
use rustc_hash::FxHashMap;

/// A PDF dictionary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dict(FxHashMap<Name, Object>);

impl Dict {
    /// Create a new, empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry into the dictionary.
    pub fn insert(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        self.0.insert(key.into(), value.into());
    }

    /// Return the raw, unresolved object stored under the given key.
    pub fn get_raw(&self, key: &[u8]) -> Option<&Object> {
        self.0.get(key)
    }

    /// Whether the dictionary contains the given key.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.0.contains_key(key)
    }

    /// The number of entries in the dictionary.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an optional entry, resolved and cast to the given type.
    ///
    /// An absent key yields `Ok(None)`; a present entry of the wrong kind is
    /// a type error.
    pub fn get<T: FromObject>(&self, key: &[u8], r: &dyn Resolve) -> Result<Option<T>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(obj) => T::from_object(r.resolve(obj), r)
                .map(Some)
                .ok_or_else(|| Error::key_type(key, T::EXPECTED)),
        }
    }

    /// Get a required entry, resolved and cast to the given type.
    pub fn get_required<T: FromObject>(&self, key: &[u8], r: &dyn Resolve) -> Result<T> {
        let obj = self.0.get(key).ok_or_else(|| Error::missing_key(key))?;

        T::from_object(r.resolve(obj), r).ok_or_else(|| Error::key_type(key, T::EXPECTED))
    }
}

/// A collection of the dictionary keys and name values used by color spaces
/// and tint-transform functions.
#[allow(missing_docs)]
pub mod keys {
    macro_rules! key {
        ($i:ident, $e:expr) => {
            pub const $i: &'static [u8] = $e;
        };
    }

    // Color space names.
    key!(CALCMYK, b"CalCMYK");
    key!(CALGRAY, b"CalGray");
    key!(CALRGB, b"CalRGB");
    key!(CMYK, b"CMYK");
    key!(DEVICE_CMYK, b"DeviceCMYK");
    key!(DEVICE_GRAY, b"DeviceGray");
    key!(DEVICE_N, b"DeviceN");
    key!(DEVICE_RGB, b"DeviceRGB");
    key!(G, b"G");
    key!(I, b"I");
    key!(ICC_BASED, b"ICCBased");
    key!(INDEXED, b"Indexed");
    key!(LAB, b"Lab");
    key!(PATTERN, b"Pattern");
    key!(RGB, b"RGB");
    key!(SEPARATION, b"Separation");

    // Color space parameters.
    key!(ALTERNATE, b"Alternate");
    key!(BLACK_POINT, b"BlackPoint");
    key!(GAMMA, b"Gamma");
    key!(MATRIX, b"Matrix");
    key!(N, b"N");
    key!(NONE, b"None");
    key!(RANGE, b"Range");
    key!(WHITE_POINT, b"WhitePoint");

    // Function parameters.
    key!(BOUNDS, b"Bounds");
    key!(C0, b"C0");
    key!(C1, b"C1");
    key!(DOMAIN, b"Domain");
    key!(ENCODE, b"Encode");
    key!(FUNCTIONS, b"Functions");
    key!(FUNCTION_TYPE, b"FunctionType");
}

#[cfg(test)]
mod tests {
    use super::keys::{GAMMA, WHITE_POINT};
    use super::*;
    use crate::object::{NoResolve, ObjectStore, Ref};

    #[test]
    fn typed_get() {
        let mut dict = Dict::new();
        dict.insert(WHITE_POINT, vec![0.9505_f32, 1.0, 1.089]);
        dict.insert(GAMMA, 2.2_f32);

        assert_eq!(
            dict.get::<[f32; 3]>(WHITE_POINT, &NoResolve).unwrap(),
            Some([0.9505, 1.0, 1.089])
        );
        assert_eq!(dict.get::<f32>(GAMMA, &NoResolve).unwrap(), Some(2.2));
        assert_eq!(dict.get::<f32>(b"Missing", &NoResolve).unwrap(), None);
    }

    #[test]
    fn wrong_type_is_an_error() {
        let mut dict = Dict::new();
        dict.insert(GAMMA, Object::name("NotANumber"));

        assert!(dict.get::<f32>(GAMMA, &NoResolve).is_err());
    }

    #[test]
    fn missing_required_key() {
        let dict = Dict::new();

        assert_eq!(
            dict.get_required::<f32>(GAMMA, &NoResolve),
            Err(Error::MissingKey("Gamma".to_string()))
        );
    }

    #[test]
    fn resolves_references() {
        let mut store = ObjectStore::new();
        store.insert(Ref::new(4, 0), Object::Real(1.8));

        let mut dict = Dict::new();
        dict.insert(GAMMA, Object::Reference(Ref::new(4, 0)));

        assert_eq!(dict.get::<f32>(GAMMA, &store).unwrap(), Some(1.8));
    }
}
