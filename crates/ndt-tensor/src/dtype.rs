use std::fmt;

/// Element kinds a tensor can hold and the codec can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// `bool`, bit-packed on the wire.
    Bool,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `f32`.
    F32,
    /// `i64`.
    I64,
    /// `f64`.
    F64,
}

impl DType {
    /// All element kinds, in tag order.
    pub const ALL: [DType; 7] = [
        DType::Bool,
        DType::I8,
        DType::I16,
        DType::I32,
        DType::F32,
        DType::I64,
        DType::F64,
    ];

    /// Width of one element in bits.
    ///
    /// - Bool: 1 bit (8 values share a byte)
    /// - I8: 8, I16: 16, I32/F32: 32, I64/F64: 64
    pub fn size_in_bits(&self) -> usize {
        match self {
            DType::Bool => 1,
            DType::I8 => 8,
            DType::I16 => 16,
            DType::I32 | DType::F32 => 32,
            DType::I64 | DType::F64 => 64,
        }
    }

    /// Number of payload bytes needed for `numel` elements of this kind.
    pub fn payload_len(&self, numel: usize) -> usize {
        (numel * self.size_in_bits()).div_ceil(8)
    }

    /// Converts a wire tag to a `DType`.
    ///
    /// Tags:
    /// - 1 => Bool
    /// - 2 => I8
    /// - 3 => I16
    /// - 4 => I32
    /// - 5 => F32
    /// - 6 => I64
    /// - 7 => F64
    pub fn from_tag(tag: u8) -> Option<DType> {
        match tag {
            1 => Some(DType::Bool),
            2 => Some(DType::I8),
            3 => Some(DType::I16),
            4 => Some(DType::I32),
            5 => Some(DType::F32),
            6 => Some(DType::I64),
            7 => Some(DType::F64),
            _ => None,
        }
    }

    /// Returns the wire tag for this `DType`.
    pub fn to_tag(&self) -> u8 {
        match self {
            DType::Bool => 1,
            DType::I8 => 2,
            DType::I16 => 3,
            DType::I32 => 4,
            DType::F32 => 5,
            DType::I64 => 6,
            DType::F64 => 7,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::I8 => write!(f, "i8"),
            DType::I16 => write!(f, "i16"),
            DType::I32 => write!(f, "i32"),
            DType::F32 => write!(f, "f32"),
            DType::I64 => write!(f, "i64"),
            DType::F64 => write!(f, "f64"),
        }
    }
}

/// A Rust type that corresponds to one of the closed set of [`DType`]s.
pub trait Element: Copy + PartialEq + fmt::Debug + Default + Send + Sync + 'static {
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($t:ty => $dtype:ident),+ $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$dtype;
            }
        )+
    };
}

impl_element!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    f32 => F32,
    i64 => I64,
    f64 => F64,
);
