//! Byte unit conversions shared by selection and progress reporting.

/// 1 MB as used for blob-size assumptions (binary megabyte).
pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

pub const BYTES_PER_GIGABYTE: f64 = BYTES_PER_MEGABYTE * 1024.0;

pub fn bytes_to_megabytes(bytes: f64) -> f64 {
    bytes / BYTES_PER_MEGABYTE
}

pub fn megabytes_to_bytes(mb: f64) -> f64 {
    mb * BYTES_PER_MEGABYTE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megabyte_is_binary() {
        assert_eq!(BYTES_PER_MEGABYTE, 1_048_576.0);
        assert_eq!(megabytes_to_bytes(2.0), 2_097_152.0);
        assert_eq!(bytes_to_megabytes(3_145_728.0), 3.0);
    }
}
