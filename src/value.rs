use crate::error::ValueError;
use std::alloc::{self, Layout};
use std::fmt;
use std::io;
use std::mem;

/// Runtime value. Owned payloads (String, Symbol, Tensor) belong to the
/// value holding them and are freed by [`Value::release`] or on drop.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Symbol(String),
    BigInt(i64),
    Vec3(Vec3),
    Tensor(Tensor),

    // Reference types, not implemented yet.
    Object(Opaque),
    Array(Opaque),
    Date(Opaque),
    Map(Opaque),
    Set(Opaque),
    WeakMap(Opaque),
    WeakSet(Opaque),
    Function(Opaque),
}

/// Placeholder payload for reference variants. Only this crate can make one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opaque {
    _private: (),
}

impl Opaque {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Metadata stored ahead of the element slots.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorHeader {
    pub rows: usize,
    pub cols: usize,
}

pub const TENSOR_HEADER_SIZE: usize = mem::size_of::<TensorHeader>();

/// Dense row-major 2D buffer of `f32`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    header: TensorHeader,
    data: Box<[f32]>,
}

impl Tensor {
    /// Allocates a zero-filled `rows x cols` tensor.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ValueError> {
        if rows == 0 || cols == 0 {
            return Err(ValueError::InvalidDimensions {
                rows: rows as i64,
                cols: cols as i64,
            });
        }

        let (len, bytes) = tensor_allocation_size(rows, cols, isize::MAX as usize)?;
        let data = alloc_zeroed_slice(len).ok_or(ValueError::OutOfMemory {
            what: "tensor",
            bytes,
        })?;

        Ok(Self {
            header: TensorHeader { rows, cols },
            data,
        })
    }

    /// Like [`Tensor::new`] for signed dimensions: non-positive values are
    /// invalid, values wider than the address space overflow.
    pub fn from_dims(rows: i64, cols: i64) -> Result<Self, ValueError> {
        if rows <= 0 || cols <= 0 {
            return Err(ValueError::InvalidDimensions { rows, cols });
        }
        match (usize::try_from(rows), usize::try_from(cols)) {
            (Ok(r), Ok(c)) => Self::new(r, c),
            _ => Err(ValueError::ElementCountOverflow {
                rows: rows as u64,
                cols: cols as u64,
            }),
        }
    }

    pub fn rows(&self) -> usize {
        self.header.rows
    }

    pub fn cols(&self) -> usize {
        self.header.cols
    }

    pub fn header(&self) -> TensorHeader {
        self.header
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.data.get(row * self.cols() + col).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) -> bool {
        if row >= self.rows() || col >= self.cols() {
            return false;
        }
        let cols = self.cols();
        match self.data.get_mut(row * cols + col) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Header plus element bytes.
    pub fn allocation_size(&self) -> usize {
        TENSOR_HEADER_SIZE + self.data.len() * mem::size_of::<f32>()
    }
}

/// Zero-filled slice from the allocator's zeroed path, so untouched pages are
/// never written. `None` when the allocation fails.
fn alloc_zeroed_slice(len: usize) -> Option<Box<[f32]>> {
    if len == 0 {
        return Some(Box::default());
    }
    let layout = Layout::array::<f32>(len).ok()?;
    // SAFETY: `layout` has a non-zero size. A non-null result is a block
    // sized and aligned for `len` f32s, all bits zero (a valid 0.0), and is
    // handed to a Box whose deallocation uses this same layout.
    unsafe {
        let ptr = alloc::alloc_zeroed(layout).cast::<f32>();
        if ptr.is_null() {
            return None;
        }
        Some(Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)))
    }
}

/// Element count and total byte size (header plus elements) of a tensor,
/// checked against `limit`, the largest allocation the platform allows.
pub fn tensor_allocation_size(rows: usize, cols: usize, limit: usize) -> Result<(usize, usize), ValueError> {
    let len = rows
        .checked_mul(cols)
        .filter(|&len| len <= limit)
        .ok_or(ValueError::ElementCountOverflow {
            rows: rows as u64,
            cols: cols as u64,
        })?;

    let bytes = len
        .checked_mul(mem::size_of::<f32>())
        .and_then(|payload| payload.checked_add(TENSOR_HEADER_SIZE))
        .filter(|&bytes| bytes <= limit)
        .ok_or(ValueError::AllocationSizeOverflow {
            rows: rows as u64,
            cols: cols as u64,
        })?;

    Ok((len, bytes))
}

pub fn make_undefined() -> Value {
    Value::Undefined
}

pub fn make_null() -> Value {
    Value::Null
}

pub fn make_boolean(b: bool) -> Value {
    Value::Boolean(b)
}

pub fn make_number(x: f64) -> Value {
    Value::Number(x)
}

/// Copies `text` into an owned String value. An absent input is Null, and so
/// is an allocation failure (logged).
pub fn make_string(text: Option<&str>) -> Value {
    match text.map(duplicate) {
        Some(Ok(s)) => Value::String(s),
        Some(Err(err)) => {
            tracing::error!(%err, "make_string failed, falling back to null");
            Value::Null
        }
        None => Value::Null,
    }
}

pub fn make_symbol(description: Option<&str>) -> Value {
    match description.map(duplicate) {
        Some(Ok(s)) => Value::Symbol(s),
        Some(Err(err)) => {
            tracing::error!(%err, "make_symbol failed, falling back to null");
            Value::Null
        }
        None => Value::Null,
    }
}

pub fn make_bigint(n: i64) -> Value {
    Value::BigInt(n)
}

pub fn make_vec3(x: f32, y: f32, z: f32) -> Value {
    Value::Vec3(Vec3 { x, y, z })
}

/// Zero-filled `rows x cols` tensor, or Null (logged) when the dimensions
/// are not positive or the allocation size would overflow.
pub fn make_tensor(rows: i64, cols: i64) -> Value {
    match Tensor::from_dims(rows, cols) {
        Ok(tensor) => Value::Tensor(tensor),
        Err(err) => {
            tracing::error!(rows, cols, %err, "make_tensor failed, falling back to null");
            Value::Null
        }
    }
}

fn duplicate(text: &str) -> Result<String, ValueError> {
    let mut owned = String::new();
    owned.try_reserve_exact(text.len()).map_err(|_| ValueError::OutOfMemory {
        what: "string",
        bytes: text.len(),
    })?;
    owned.push_str(text);
    Ok(owned)
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::BigInt(_) => "bigint",
            Value::Vec3(_) => "vec3",
            Value::Tensor(_) => "tensor",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Date(_) => "date",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::WeakMap(_) => "weakmap",
            Value::WeakSet(_) => "weakset",
            Value::Function(_) => "function",
        }
    }

    pub fn owns_payload(&self) -> bool {
        matches!(self, Value::String(_) | Value::Symbol(_) | Value::Tensor(_))
    }

    /// Frees an owned payload and leaves the value as Undefined. A no-op for
    /// every other variant, so calling it again is always safe.
    pub fn release(&mut self) {
        if self.owns_payload() {
            drop(mem::replace(self, Value::Undefined));
        }
    }

    /// Writes the value followed by a newline.
    pub fn print<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => fmt_number(f, *n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Symbol(s) => write!(f, "Symbol({})", s),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::Vec3(v) => write!(f, "Vec3({}, {}, {})", v.x, v.y, v.z),
            Value::Tensor(t) => write!(f, "Tensor[{}x{}]", t.rows(), t.cols()),
            Value::Object(_) => write!(f, "[Object]"),
            Value::Array(_) => write!(f, "[Array]"),
            Value::Date(_) => write!(f, "[Date]"),
            Value::Map(_) => write!(f, "[Map]"),
            Value::Set(_) => write!(f, "[Set]"),
            Value::WeakMap(_) => write!(f, "[WeakMap]"),
            Value::WeakSet(_) => write!(f, "[WeakSet]"),
            Value::Function(_) => write!(f, "[Function]"),
        }
    }
}

/// Shortest round-trip digits; plain decimal for `1e-6 <= |n| < 1e21`,
/// exponent form (`1e+21`, `1.5e-7`) outside it.
fn fmt_number(f: &mut fmt::Formatter, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
    } else if n == 0.0 || (1e-6..1e21).contains(&n.abs()) {
        write!(f, "{}", n)
    } else {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{}e+{}", mantissa, exponent)
            }
            _ => f.write_str(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn placeholders_print_bracketed() {
        let cases = [
            (Value::Object(Opaque::new()), "[Object]"),
            (Value::Array(Opaque::new()), "[Array]"),
            (Value::Date(Opaque::new()), "[Date]"),
            (Value::Map(Opaque::new()), "[Map]"),
            (Value::Set(Opaque::new()), "[Set]"),
            (Value::WeakMap(Opaque::new()), "[WeakMap]"),
            (Value::WeakSet(Opaque::new()), "[WeakSet]"),
            (Value::Function(Opaque::new()), "[Function]"),
        ];
        for (value, expected) in cases {
            assert_eq!(value.to_string(), expected);
            assert!(!value.owns_payload());
        }
    }

    #[test]
    fn allocation_size_rejects_overflow_on_32_bit_limit() {
        let limit = u32::MAX as usize;
        assert_eq!(
            tensor_allocation_size(70_000, 70_000, limit),
            Err(ValueError::ElementCountOverflow { rows: 70_000, cols: 70_000 })
        );
        // Element count fits, bytes do not.
        assert_eq!(
            tensor_allocation_size(1 << 16, 1 << 15, limit),
            Err(ValueError::AllocationSizeOverflow { rows: 1 << 16, cols: 1 << 15 })
        );
        assert!(tensor_allocation_size(1024, 1024, limit).is_ok());
    }

    #[test]
    fn allocation_size_rejects_overflow_on_64_bit_limit() {
        let limit = usize::MAX;
        assert_eq!(
            tensor_allocation_size(usize::MAX, 2, limit),
            Err(ValueError::ElementCountOverflow {
                rows: usize::MAX as u64,
                cols: 2
            })
        );
        assert_eq!(
            tensor_allocation_size(usize::MAX / 2, 1, limit),
            Err(ValueError::AllocationSizeOverflow {
                rows: (usize::MAX / 2) as u64,
                cols: 1
            })
        );
    }

    #[test]
    fn allocation_size_includes_header() {
        let (len, bytes) = tensor_allocation_size(2, 3, usize::MAX).unwrap();
        assert_eq!(len, 6);
        assert_eq!(bytes, TENSOR_HEADER_SIZE + 6 * 4);
    }

    #[test]
    fn release_resets_owned_variants() {
        let mut value = make_tensor(2, 2);
        assert!(value.owns_payload());
        value.release();
        assert_eq!(value, Value::Undefined);
        value.release();
        assert_eq!(value, Value::Undefined);
    }

    #[test]
    fn zeroed_slice_reads_as_zero() {
        let slice = alloc_zeroed_slice(1 << 20).unwrap();
        assert_eq!(slice.len(), 1 << 20);
        assert!(slice.iter().all(|&x| x == 0.0));
        assert!(alloc_zeroed_slice(0).unwrap().is_empty());
    }

    #[test]
    fn large_tensor_is_zero_at_the_corners() {
        // 64 MiB; zeroed allocation leaves the middle pages untouched.
        let tensor = Tensor::new(4096, 4096).unwrap();
        assert_eq!(tensor.get(0, 0), Some(0.0));
        assert_eq!(tensor.get(4095, 4095), Some(0.0));
        assert_eq!(tensor.as_slice().len(), 4096 * 4096);
    }

    #[test]
    fn signed_dimensions_report_the_right_failure() {
        assert_eq!(
            Tensor::from_dims(-1, 5),
            Err(ValueError::InvalidDimensions { rows: -1, cols: 5 })
        );
        assert_eq!(
            Tensor::from_dims(3, 0),
            Err(ValueError::InvalidDimensions { rows: 3, cols: 0 })
        );
        // Overflow, not "must be positive", on 32-bit and 64-bit alike.
        assert_eq!(
            Tensor::from_dims(i64::MAX, 2),
            Err(ValueError::ElementCountOverflow {
                rows: i64::MAX as u64,
                cols: 2
            })
        );
        assert_eq!(Tensor::from_dims(2, 3).map(|t| (t.rows(), t.cols())), Ok((2, 3)));
    }
}
