//! Exif field types and the table of tags this crate extracts.
//!
//! Only tags listed in [`TAG_TABLE`] are decoded. Adding a field to the
//! output is a matter of adding a row here and a [`Field`] variant.

// =============================================================================
// Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// The size of each type decides whether a value fits inline in the 4-byte
/// value field of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two LONGs: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLONGs: numerator, denominator
    SRational = 10,

    /// IEEE single precision
    Float = 11,

    /// IEEE double precision
    Double = 12,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Maximum bytes stored inline in a directory entry.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Total byte length of `count` values, or `None` on overflow.
    #[inline]
    pub fn byte_length(self, count: u32) -> Option<usize> {
        self.size_in_bytes().checked_mul(usize::try_from(count).ok()?)
    }

    /// Check if `count` values of this type fit in the inline value field.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        matches!(self.byte_length(count), Some(len) if len <= Self::INLINE_THRESHOLD)
    }
}

// =============================================================================
// Tags of Interest
// =============================================================================

/// Exif tag ids used by this crate.
pub mod tag {
    pub const MAKE: u16 = 0x010F;
    pub const MODEL: u16 = 0x0110;
    pub const DATE_TIME: u16 = 0x0132;
    pub const EXPOSURE_TIME: u16 = 0x829A;
    pub const F_NUMBER: u16 = 0x829D;
    pub const EXIF_IFD_POINTER: u16 = 0x8769;
    pub const ISO_SPEED_RATINGS: u16 = 0x8827;
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
    pub const EXPOSURE_BIAS: u16 = 0x9204;
    pub const FOCAL_LENGTH: u16 = 0x920A;
    pub const LENS_MODEL: u16 = 0xA434;
}

/// Length of an Exif date-time value: "YYYY:MM:DD HH:MM:SS" plus NUL.
pub const DATE_TIME_LENGTH: u32 = 20;

/// Output field a tag feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CapturedAt,
    CameraMake,
    CameraModel,
    ExposureTime,
    ExposureBias,
    Aperture,
    Iso,
    FocalLength,
    LensModel,
    /// Not an output field: links IFD0 to the Exif sub-directory
    ExifIfd,
}

/// Value count a tag must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Exact(u32),
    AtLeast(u32),
}

impl Count {
    #[inline]
    pub fn accepts(self, count: u32) -> bool {
        match self {
            Count::Exact(n) => count == n,
            Count::AtLeast(n) => count >= n,
        }
    }
}

/// One row of the tag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    pub tag: u16,
    pub name: &'static str,
    pub types: &'static [FieldType],
    pub count: Count,
    pub field: Field,
}

/// Tags decoded by this crate, in assembly priority order.
///
/// When two rows feed the same field, the earlier row wins if its value is
/// usable; DateTimeOriginal therefore precedes DateTime.
pub static TAG_TABLE: &[TagSpec] = &[
    TagSpec {
        tag: tag::DATE_TIME_ORIGINAL,
        name: "DateTimeOriginal",
        types: &[FieldType::Ascii],
        count: Count::Exact(DATE_TIME_LENGTH),
        field: Field::CapturedAt,
    },
    TagSpec {
        tag: tag::DATE_TIME,
        name: "DateTime",
        types: &[FieldType::Ascii],
        count: Count::Exact(DATE_TIME_LENGTH),
        field: Field::CapturedAt,
    },
    TagSpec {
        tag: tag::MAKE,
        name: "Make",
        types: &[FieldType::Ascii],
        count: Count::AtLeast(1),
        field: Field::CameraMake,
    },
    TagSpec {
        tag: tag::MODEL,
        name: "Model",
        types: &[FieldType::Ascii],
        count: Count::AtLeast(1),
        field: Field::CameraModel,
    },
    TagSpec {
        tag: tag::EXPOSURE_TIME,
        name: "ExposureTime",
        types: &[FieldType::Rational],
        count: Count::Exact(1),
        field: Field::ExposureTime,
    },
    TagSpec {
        tag: tag::EXPOSURE_BIAS,
        name: "ExposureBiasValue",
        types: &[FieldType::SRational],
        count: Count::Exact(1),
        field: Field::ExposureBias,
    },
    TagSpec {
        tag: tag::F_NUMBER,
        name: "FNumber",
        types: &[FieldType::Rational],
        count: Count::Exact(1),
        field: Field::Aperture,
    },
    TagSpec {
        tag: tag::ISO_SPEED_RATINGS,
        name: "ISOSpeedRatings",
        types: &[FieldType::Short, FieldType::Long],
        count: Count::AtLeast(1),
        field: Field::Iso,
    },
    TagSpec {
        tag: tag::FOCAL_LENGTH,
        name: "FocalLength",
        types: &[FieldType::Rational],
        count: Count::Exact(1),
        field: Field::FocalLength,
    },
    TagSpec {
        tag: tag::LENS_MODEL,
        name: "LensModel",
        types: &[FieldType::Ascii],
        count: Count::AtLeast(1),
        field: Field::LensModel,
    },
    TagSpec {
        tag: tag::EXIF_IFD_POINTER,
        name: "ExifIFDPointer",
        types: &[FieldType::Long],
        count: Count::Exact(1),
        field: Field::ExifIfd,
    },
];

/// Look up the table row for a tag id.
pub fn lookup(tag: u16) -> Option<&'static TagSpec> {
    TAG_TABLE.iter().find(|spec| spec.tag == tag)
}

// =============================================================================
// Tests
// =============================================================================
