use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

/// Gzip-compresses a response body at the default level.
pub fn gzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(body.len() / 2), Compression::default());
    encoder.write_all(body)?;
    encoder.finish()
}
