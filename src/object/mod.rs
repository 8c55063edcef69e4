//! An owned model of the primitive PDF object types.
//!
//! Color space descriptors reference other objects pervasively (a `Lab`
//! dictionary behind an indirect reference, a lookup table stored in a
//! stream), so everything that inspects an object goes through a [`Resolve`]
//! implementation first. [`ObjectStore`] is the writable store used both for
//! resolving references at parse time and for re-serializing color spaces
//! into their original containers.

pub mod dict;
pub mod name;

pub use dict::Dict;
pub use name::Name;

use rustc_hash::FxHashMap;

/// A primitive PDF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A null object.
    Null,
    /// A boolean object.
    Boolean(bool),
    /// An integer number object.
    Integer(i64),
    /// A real number object.
    Real(f32),
    /// A string object, holding its raw bytes.
    String(Vec<u8>),
    /// A name object.
    Name(Name),
    /// An array object.
    Array(Vec<Object>),
    /// A dict object.
    Dict(Dict),
    /// A stream object.
    Stream(Stream),
    /// An indirect reference to another object.
    Reference(Ref),
}

impl Object {
    /// Create a name object.
    pub fn name(name: impl Into<Name>) -> Self {
        Self::Name(name.into())
    }

    /// Return the numeric value if the object is an integer or real number.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Integer(i) => Some(*i as f32),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Return the value if the object is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Return the name if the object is a name.
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Self::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Return the elements if the object is an array.
    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Return the dictionary if the object is a dict or a stream.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            Self::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    /// Return the stream if the object is a stream.
    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Self::Stream(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for Object {
    fn from(value: f32) -> Self {
        Self::Real(value)
    }
}

impl From<Name> for Object {
    fn from(value: Name) -> Self {
        Self::Name(value)
    }
}

impl From<Dict> for Object {
    fn from(value: Dict) -> Self {
        Self::Dict(value)
    }
}

impl From<Stream> for Object {
    fn from(value: Stream) -> Self {
        Self::Stream(value)
    }
}

impl From<Vec<Object>> for Object {
    fn from(value: Vec<Object>) -> Self {
        Self::Array(value)
    }
}

impl From<Vec<f32>> for Object {
    fn from(value: Vec<f32>) -> Self {
        Self::Array(value.into_iter().map(Self::Real).collect())
    }
}

/// A PDF stream: a dictionary together with its (already decoded) data.
///
/// Stream filters belong to the surrounding tokenizer; the data stored here
/// is expected to be the plain bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// The dictionary of the stream.
    pub dict: Dict,
    /// The decoded data of the stream.
    pub data: Vec<u8>,
}

impl Stream {
    /// Create a new stream from a dictionary and decoded data.
    pub fn new(dict: Dict, data: Vec<u8>) -> Self {
        Self { dict, data }
    }

    /// Return the decoded data of the stream.
    pub fn decoded(&self) -> &[u8] {
        &self.data
    }
}

/// An identifier of an indirect object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref {
    /// The object number.
    pub obj_num: i32,
    /// The generation number.
    pub gen_num: u16,
}

impl Ref {
    /// Create a new reference from an object and a generation number.
    pub fn new(obj_num: i32, gen_num: u16) -> Self {
        Self { obj_num, gen_num }
    }
}

static NULL: Object = Object::Null;

// An unresolvable reference behaves like the null object, matching how PDF
// readers treat dangling references.
const MAX_REFERENCE_CHAIN: usize = 32;

/// A source of indirect objects.
pub trait Resolve {
    /// Look up the object stored under the given reference.
    fn lookup(&self, r: Ref) -> Option<&Object>;

    /// Follow reference chains until a direct object is reached.
    ///
    /// Dangling and cyclic references resolve to the null object.
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        let mut current = obj;

        for _ in 0..MAX_REFERENCE_CHAIN {
            match current {
                Object::Reference(r) => match self.lookup(*r) {
                    Some(next) => current = next,
                    None => return &NULL,
                },
                _ => return current,
            }
        }

        &NULL
    }
}

/// A [`Resolve`] implementation for fully direct objects.
#[derive(Debug, Copy, Clone)]
pub struct NoResolve;

impl Resolve for NoResolve {
    fn lookup(&self, _: Ref) -> Option<&Object> {
        None
    }
}

/// A writable store of indirect objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: FxHashMap<Ref, Object>,
    next_num: i32,
}

impl ObjectStore {
    /// Create a new, empty object store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object under the given reference, overwriting any previous
    /// object stored there.
    pub fn insert(&mut self, r: Ref, obj: Object) {
        self.next_num = self.next_num.max(r.obj_num);
        self.objects.insert(r, obj);
    }

    /// Store an object under a freshly allocated reference.
    pub fn allocate(&mut self, obj: Object) -> Ref {
        self.next_num += 1;
        let r = Ref::new(self.next_num, 0);
        self.objects.insert(r, obj);

        r
    }

    /// The number of objects in the store.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Resolve for ObjectStore {
    fn lookup(&self, r: Ref) -> Option<&Object> {
        self.objects.get(&r)
    }
}

/// Conversion of a (resolved) object into a typed value.
pub trait FromObject: Sized {
    /// The kind of object this conversion requires, for error reporting.
    const EXPECTED: &'static str;

    /// Convert the object, returning `None` if it has the wrong kind.
    fn from_object(obj: &Object, r: &dyn Resolve) -> Option<Self>;
}

impl FromObject for Object {
    const EXPECTED: &'static str = "object";

    fn from_object(obj: &Object, _: &dyn Resolve) -> Option<Self> {
        Some(obj.clone())
    }
}

impl FromObject for f32 {
    const EXPECTED: &'static str = "number";

    fn from_object(obj: &Object, _: &dyn Resolve) -> Option<Self> {
        obj.as_f32()
    }
}

impl FromObject for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_object(obj: &Object, _: &dyn Resolve) -> Option<Self> {
        obj.as_i64()
    }
}

impl FromObject for usize {
    const EXPECTED: &'static str = "non-negative integer";

    fn from_object(obj: &Object, _: &dyn Resolve) -> Option<Self> {
        obj.as_i64().and_then(|i| Self::try_from(i).ok())
    }
}

impl FromObject for Name {
    const EXPECTED: &'static str = "name";

    fn from_object(obj: &Object, _: &dyn Resolve) -> Option<Self> {
        obj.as_name().cloned()
    }
}

impl FromObject for Dict {
    const EXPECTED: &'static str = "dictionary";

    fn from_object(obj: &Object, _: &dyn Resolve) -> Option<Self> {
        obj.as_dict().cloned()
    }
}

impl FromObject for Stream {
    const EXPECTED: &'static str = "stream";

    fn from_object(obj: &Object, _: &dyn Resolve) -> Option<Self> {
        obj.as_stream().cloned()
    }
}

impl FromObject for Vec<f32> {
    const EXPECTED: &'static str = "number array";

    fn from_object(obj: &Object, r: &dyn Resolve) -> Option<Self> {
        obj.as_array()?
            .iter()
            .map(|o| r.resolve(o).as_f32())
            .collect()
    }
}

impl<const N: usize> FromObject for [f32; N] {
    const EXPECTED: &'static str = "number array";

    fn from_object(obj: &Object, r: &dyn Resolve) -> Option<Self> {
        Vec::<f32>::from_object(obj, r)?.try_into().ok()
    }
}
