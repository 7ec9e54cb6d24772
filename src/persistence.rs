//! Versioned byte-stream persistence for built trees.
//!
//! Building a multi-million-record tree is expensive; the tree is meant to
//! be built once and reused across process restarts. The encoding is an
//! 8-byte magic/version header followed by the bincode payload, including
//! the chosen split bits (stored, never recomputed), so a reloaded tree
//! answers every query identically to the original.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::{BitsieveError, Result};
use crate::index::SupersetIndex;

/// Magic prefix of the serialized form; bump the trailing digits on any
/// incompatible layout change.
const MAGIC: &[u8; 8] = b"BSIEVE01";

impl SupersetIndex {
    /// Serialize the index to a standalone byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::from(&MAGIC[..]);
        bincode::serialize_into(&mut buf, self)?;
        Ok(buf)
    }

    /// Reconstruct an index from [`to_bytes`](Self::to_bytes) output.
    ///
    /// Verifies the magic header, decodes, and re-runs the structural
    /// validator; any mismatch surfaces as [`BitsieveError::Corrupt`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let payload = bytes
            .strip_prefix(&MAGIC[..])
            .ok_or_else(|| BitsieveError::Corrupt("bad magic header".into()))?;
        let index: Self = bincode::deserialize(payload)?;
        index.validate()?;
        Ok(index)
    }

    /// Write the serialized index to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(MAGIC)?;
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        tracing::debug!(path = %path.as_ref().display(), records = self.len(), "saved index");
        Ok(())
    }

    /// Load an index previously written with [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitVector;
    use crate::config::BuildConfig;
    use crate::types::Record;

    fn sample_index() -> SupersetIndex {
        let records: Vec<Record> = (0..100u64)
            .map(|row| {
                let r = row as usize;
                Record::new(
                    BitVector::from_bits(&[r % 16, (r * 5) % 16, (r * 7) % 16]),
                    row,
                )
            })
            .collect();
        let mut cfg = BuildConfig::new(16);
        cfg.bin_size = 4;
        SupersetIndex::build(records, &cfg).unwrap()
    }

    #[test]
    fn byte_round_trip_reconstructs_the_identical_tree() {
        let index = sample_index();
        let restored = SupersetIndex::from_bytes(&index.to_bytes().unwrap()).unwrap();
        assert_eq!(index, restored);

        for bits in [&[3][..], &[3, 5][..], &[][..]] {
            let query = BitVector::from_bits(bits);
            assert_eq!(
                index.collect(&query, usize::MAX),
                restored.collect(&query, usize::MAX)
            );
        }
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = sample_index().to_bytes().unwrap();
        bytes[0] ^= 0xFF;
        assert!(matches!(
            SupersetIndex::from_bytes(&bytes),
            Err(BitsieveError::Corrupt(_))
        ));
        assert!(SupersetIndex::from_bytes(b"BS").is_err());
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let bytes = sample_index().to_bytes().unwrap();
        assert!(SupersetIndex::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn save_and_load_through_a_file() {
        let index = sample_index();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bsieve");
        index.save(&path).unwrap();
        let restored = SupersetIndex::load(&path).unwrap();
        assert_eq!(index, restored);
    }
}
