//! Typed string↔value conversion for path and query parameters.
//!
//! A route declares each controller parameter with a semantic type name
//! ([`ParamType`]). At request time the raw path or query value is converted
//! through the first registered [`ParameterBinder`] that accepts the type;
//! reverse routing runs the same binder the other way. Registering a binder
//! for a new type extends the vocabulary without touching core code.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::{BindingError, UnbindingError};

/// Render format for `DateTime` parameters. `NaiveDateTime`'s `Display` uses
/// a space separator which would not survive a URL round trip.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Semantic parameter type, identified by name.
///
/// The name is what appears in route definitions (`i64 id`, `Uuid token`).
/// Custom types are plain names too: declare them with [`ParamType::named`]
/// and register a matching binder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamType(Cow<'static, str>);

impl ParamType {
    pub const STRING: ParamType = ParamType(Cow::Borrowed("String"));
    pub const BOOL: ParamType = ParamType(Cow::Borrowed("bool"));
    pub const I16: ParamType = ParamType(Cow::Borrowed("i16"));
    pub const I32: ParamType = ParamType(Cow::Borrowed("i32"));
    pub const I64: ParamType = ParamType(Cow::Borrowed("i64"));
    pub const F32: ParamType = ParamType(Cow::Borrowed("f32"));
    pub const F64: ParamType = ParamType(Cow::Borrowed("f64"));
    pub const UUID: ParamType = ParamType(Cow::Borrowed("Uuid"));
    pub const DATE: ParamType = ParamType(Cow::Borrowed("Date"));
    pub const DATE_TIME: ParamType = ParamType(Cow::Borrowed("DateTime"));

    /// A type identified by an arbitrary name, typically backed by a custom
    /// binder.
    pub fn named(name: impl Into<String>) -> Self {
        ParamType(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bound, typed parameter value.
///
/// The concrete Rust type is chosen by the binder that produced the value;
/// consumers recover it with [`BoundValue::downcast_ref`].
pub struct BoundValue {
    inner: Box<dyn Any + Send + Sync>,
}

impl BoundValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundValue").finish_non_exhaustive()
    }
}

/// Ordered name→value map produced by binding a route's parameters.
///
/// Iteration order is the declaration order of the controller parameters.
#[derive(Debug, Default)]
pub struct BoundParams {
    entries: Vec<(String, BoundValue)>,
}

impl BoundParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: BoundValue) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// String↔value converter for one or more semantic types.
pub trait ParameterBinder: Send + Sync {
    /// Whether this binder handles the given type.
    fn accepts(&self, ty: &ParamType) -> bool;

    /// Convert a raw path or query value into a typed value.
    fn bind(&self, name: &str, raw: &str) -> Result<BoundValue, BindingError>;

    /// Render a typed value back into its raw string form.
    ///
    /// The result is substituted into URLs by reverse routing; it must be a
    /// value `bind` would accept again. Percent-encoding is the caller's
    /// concern, not the binder's.
    fn unbind(&self, name: &str, value: &BoundValue) -> Result<String, UnbindingError>;
}

/// Binder for any type with `FromStr` parsing and `ToString` rendering,
/// registered under a single semantic type name.
pub struct TypedBinder<T> {
    ty: ParamType,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedBinder<T>
where
    T: FromStr + ToString + Any + Send + Sync,
{
    pub fn new(ty: ParamType) -> Self {
        Self {
            ty,
            _marker: PhantomData,
        }
    }
}

impl<T> ParameterBinder for TypedBinder<T>
where
    T: FromStr + ToString + Any + Send + Sync,
{
    fn accepts(&self, ty: &ParamType) -> bool {
        *ty == self.ty
    }

    fn bind(&self, name: &str, raw: &str) -> Result<BoundValue, BindingError> {
        raw.parse::<T>()
            .map(BoundValue::new)
            .map_err(|_| BindingError::Invalid {
                name: name.to_string(),
                ty: self.ty.name().to_string(),
                value: raw.to_string(),
            })
    }

    fn unbind(&self, name: &str, value: &BoundValue) -> Result<String, UnbindingError> {
        value
            .downcast_ref::<T>()
            .map(ToString::to_string)
            .ok_or_else(|| UnbindingError::TypeMismatch {
                name: name.to_string(),
                ty: self.ty.name().to_string(),
            })
    }
}

/// Binder for `DateTime` parameters, pinned to a URL-stable ISO format.
pub struct DateTimeBinder;

impl ParameterBinder for DateTimeBinder {
    fn accepts(&self, ty: &ParamType) -> bool {
        *ty == ParamType::DATE_TIME
    }

    fn bind(&self, name: &str, raw: &str) -> Result<BoundValue, BindingError> {
        NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
            .map(BoundValue::new)
            .map_err(|_| BindingError::Invalid {
                name: name.to_string(),
                ty: ParamType::DATE_TIME.name().to_string(),
                value: raw.to_string(),
            })
    }

    fn unbind(&self, name: &str, value: &BoundValue) -> Result<String, UnbindingError> {
        value
            .downcast_ref::<NaiveDateTime>()
            .map(|v| v.format(DATE_TIME_FORMAT).to_string())
            .ok_or_else(|| UnbindingError::TypeMismatch {
                name: name.to_string(),
                ty: ParamType::DATE_TIME.name().to_string(),
            })
    }
}

/// Registry of parameter binders.
///
/// Binders are scanned in registration order and the first one accepting the
/// type wins, mirroring the route table's own first-match policy.
pub struct ParameterBinders {
    binders: Vec<Arc<dyn ParameterBinder>>,
}

impl ParameterBinders {
    /// A registry holding the built-in binders.
    pub fn new() -> Self {
        let mut binders = Self::empty();
        binders.register(TypedBinder::<String>::new(ParamType::STRING));
        binders.register(TypedBinder::<bool>::new(ParamType::BOOL));
        binders.register(TypedBinder::<i16>::new(ParamType::I16));
        binders.register(TypedBinder::<i32>::new(ParamType::I32));
        binders.register(TypedBinder::<i64>::new(ParamType::I64));
        binders.register(TypedBinder::<f32>::new(ParamType::F32));
        binders.register(TypedBinder::<f64>::new(ParamType::F64));
        binders.register(TypedBinder::<Uuid>::new(ParamType::UUID));
        binders.register(TypedBinder::<NaiveDate>::new(ParamType::DATE));
        binders.register(DateTimeBinder);
        binders
    }

    /// A registry with no binders at all.
    pub fn empty() -> Self {
        Self {
            binders: Vec::new(),
        }
    }

    /// Register an additional binder. Earlier registrations take precedence
    /// when several binders accept the same type.
    pub fn register(&mut self, binder: impl ParameterBinder + 'static) {
        self.binders.push(Arc::new(binder));
    }

    /// Whether any registered binder accepts the type.
    pub fn accepts(&self, ty: &ParamType) -> bool {
        self.binder_for(ty).is_some()
    }

    pub fn bind(&self, ty: &ParamType, name: &str, raw: &str) -> Result<BoundValue, BindingError> {
        let binder = self.binder_for(ty).ok_or_else(|| BindingError::NoBinder {
            ty: ty.name().to_string(),
        })?;
        binder.bind(name, raw)
    }

    pub fn unbind(
        &self,
        ty: &ParamType,
        name: &str,
        value: &BoundValue,
    ) -> Result<String, UnbindingError> {
        let binder = self
            .binder_for(ty)
            .ok_or_else(|| UnbindingError::NoBinder {
                ty: ty.name().to_string(),
            })?;
        binder.unbind(name, value)
    }

    fn binder_for(&self, ty: &ParamType) -> Option<&Arc<dyn ParameterBinder>> {
        self.binders.iter().find(|b| b.accepts(ty))
    }
}

impl Default for ParameterBinders {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParameterBinders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterBinders")
            .field("binders", &self.binders.len())
            .finish()
    }
}
