use thiserror::Error;

/// I/O errors that can occur when reading a file prefix
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// The underlying file could not be opened or read
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// The blocking parse task was cancelled or panicked
    #[error("Parse task failed: {0}")]
    Task(String),
}

/// Errors related to media type detection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// File is not a supported container
    #[error("Unsupported format: {reason}")]
    UnsupportedFormat { reason: String },
}

/// A read through a bounded cursor would leave the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Out of bounds: {len} bytes at offset {offset}, buffer is {size} bytes")]
pub struct CursorError {
    pub offset: usize,
    pub len: usize,
    pub size: usize,
}

/// Errors from walking the JPEG segment structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Buffer does not start with SOI (FFD8)
    #[error("Invalid start marker: expected 0xFFD8")]
    InvalidStartMarker,

    /// Not enough bytes left to read a segment header
    #[error("Truncated segment header: {0}")]
    Truncated(#[from] CursorError),

    /// Expected a marker prefix (0xFF) but found something else
    #[error("Invalid marker byte 0x{byte:02X} at offset {offset}")]
    InvalidMarker { offset: usize, byte: u8 },

    /// Segment length field is smaller than the field itself
    #[error("Invalid segment length {length} at offset {offset}")]
    InvalidSegmentLength { offset: usize, length: u16 },

    /// Segment declares more bytes than the buffer holds
    #[error("Segment at offset {offset} declares {length} bytes but buffer is {size} bytes")]
    SegmentOverrun {
        offset: usize,
        length: usize,
        size: usize,
    },

    /// Reached start of scan (or end of image) before any Exif segment
    #[error("Reached image data at offset {0} without finding Exif segment")]
    ImageDataReached(usize),

    /// Ran out of bytes before any Exif segment
    #[error("End of buffer reached without finding Exif segment")]
    EndOfStream,
}

/// Structural errors in the Exif payload. Any of these aborts the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExifError {
    /// Payload does not start with "Exif\0\0"
    #[error("Invalid Exif signature")]
    InvalidSignature,

    /// Invalid TIFF byte order marker (not II or MM)
    #[error("Invalid byte order: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// TIFF magic number is not 42
    #[error("Invalid TIFF magic: expected 42, got {0}")]
    InvalidMagic(u16),

    /// Directory offset points into the header or outside the payload
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u32),

    /// Directory skeleton extends past the payload
    #[error("Directory out of bounds: {0}")]
    OutOfBounds(#[from] CursorError),
}

/// Errors decoding a single tag value. These only drop the affected field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Field type id is not one the decoder knows
    #[error("Unsupported field type {0}")]
    UnsupportedType(u16),

    /// Field type is valid TIFF but not accepted for this tag
    #[error("Unexpected type for {tag}: got {found}")]
    UnexpectedType { tag: &'static str, found: u16 },

    /// Value count does not match what the tag requires
    #[error("Unexpected count for {tag}: got {found}")]
    UnexpectedCount { tag: &'static str, found: u32 },

    /// Value bytes lie outside the payload
    #[error("Value out of bounds: {0}")]
    OutOfBounds(#[from] CursorError),

    /// Text value is not valid UTF-8
    #[error("Invalid text in {0}")]
    InvalidText(&'static str),

    /// type size times count does not fit in a usize
    #[error("Value size overflow for {0}")]
    Overflow(&'static str),

    /// The Exif sub-directory linked from IFD0 is structurally invalid
    #[error("Exif sub-directory unreadable: {0}")]
    SubDirectory(ExifError),
}

/// Reasons no metadata could be extracted from a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The container walk failed or found no Exif segment
    #[error("Container error: {0}")]
    Scan(#[from] ScanError),

    /// The Exif payload is structurally invalid
    #[error("Exif error: {0}")]
    Exif(#[from] ExifError),
}
