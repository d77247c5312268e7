//! Memory-mapped, on-disk bloom filter: component F.
//!
//! Same logical contract as [`crate::standard::BloomFilter`], but the bit
//! array lives in a memory-mapped file instead of process memory, and every
//! insertion eagerly rewrites the `elements_added` footer field so the file
//! on disk always reflects (at most one insertion behind, per spec) the
//! in-memory state.

use crate::standard::{BloomLike, FOOTER_BYTES};
use memmap2::{MmapMut, MmapOptions};
use probables_core::error::{ProbablesError, ProbablesResult};
use probables_core::hash::{default_fnv1a, HashFunction};
use probables_core::params::bloom_params;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A bloom filter backed by a memory-mapped file.
///
/// Owns its backing file and mapping exclusively — mapping the same file
/// read-write from two instances simultaneously is undefined behavior, per
/// spec.md §5.
pub struct BloomFilterOnDisk {
    estimated_elements: u64,
    false_positive_rate: f32,
    number_hashes: u32,
    number_bits: u64,
    bloom_length: u64,
    elements_added: u64,
    hash_func: HashFunction,
    mmap: Option<MmapMut>,
    file: Option<File>,
    path: PathBuf,
}

impl BloomFilterOnDisk {
    /// Creates a new on-disk bloom filter at `path`, overwriting any
    /// existing file, sized for `(estimated_elements, false_positive_rate)`.
    pub fn create<P: AsRef<Path>>(
        path: P,
        estimated_elements: u64,
        false_positive_rate: f32,
    ) -> ProbablesResult<Self> {
        Self::create_with_hash(path, estimated_elements, false_positive_rate, default_fnv1a)
    }

    pub fn create_with_hash<P: AsRef<Path>>(
        path: P,
        estimated_elements: u64,
        false_positive_rate: f32,
        hash_func: HashFunction,
    ) -> ProbablesResult<Self> {
        if estimated_elements == 0 {
            return Err(ProbablesError::Initialization(
                "estimated_elements must be > 0".into(),
            ));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(ProbablesError::Initialization(
                "false_positive_rate must be in (0, 1)".into(),
            ));
        }
        let (number_bits, number_hashes) = bloom_params(estimated_elements, false_positive_rate);
        let bloom_length = (number_bits + 7) / 8;

        let path = path.as_ref().to_path_buf();
        {
            let mut file = File::create(&path)?;
            file.write_all(&vec![0u8; bloom_length as usize])?;
            write_footer(&mut file, estimated_elements, 0, false_positive_rate)?;
            file.flush()?;
        }

        Self::load_with_hash(&path, hash_func)
    }

    /// Opens an existing on-disk bloom filter file, mapping it read-write.
    pub fn load<P: AsRef<Path>>(path: P) -> ProbablesResult<Self> {
        Self::load_with_hash(path, default_fnv1a)
    }

    pub fn load_with_hash<P: AsRef<Path>>(path: P, hash_func: HashFunction) -> ProbablesResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;

        let file_len = file.metadata()?.len();
        if file_len < FOOTER_BYTES as u64 {
            return Err(ProbablesError::Initialization(
                "file too small to contain a bloom footer".into(),
            ));
        }
        file.seek(SeekFrom::End(-(FOOTER_BYTES as i64)))?;
        let mut footer_buf = [0u8; FOOTER_BYTES];
        io::Read::read_exact(&mut file, &mut footer_buf)?;
        let mut cursor = Cursor::new(&footer_buf[..]);
        let estimated_elements = cursor.read_u64::<NativeEndian>()?;
        let elements_added = cursor.read_u64::<NativeEndian>()?;
        let false_positive_rate = cursor.read_f32::<NativeEndian>()?;

        let (number_bits, number_hashes) = bloom_params(estimated_elements, false_positive_rate);
        let bloom_length = (number_bits + 7) / 8;
        if file_len != bloom_length + FOOTER_BYTES as u64 {
            return Err(ProbablesError::Initialization(
                "file size does not match derived bloom geometry".into(),
            ));
        }

        file.seek(SeekFrom::Start(0))?;
        let mmap = unsafe { MmapOptions::new().len(file_len as usize).map_mut(&file)? };

        Ok(Self {
            estimated_elements,
            false_positive_rate,
            number_hashes,
            number_bits,
            bloom_length,
            elements_added,
            hash_func,
            mmap: Some(mmap),
            file: Some(file),
            path,
        })
    }

    #[must_use]
    pub fn estimated_elements(&self) -> u64 {
        self.estimated_elements
    }
    #[must_use]
    pub fn false_positive_rate(&self) -> f32 {
        self.false_positive_rate
    }
    #[must_use]
    pub fn number_hashes(&self) -> u32 {
        self.number_hashes
    }
    #[must_use]
    pub fn number_bits(&self) -> u64 {
        self.number_bits
    }
    #[must_use]
    pub fn bloom_length(&self) -> u64 {
        self.bloom_length
    }
    #[must_use]
    pub fn elements_added(&self) -> u64 {
        self.elements_added
    }
    #[must_use]
    pub fn hash_function(&self) -> HashFunction {
        self.hash_func
    }
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mmap(&self) -> &MmapMut {
        self.mmap.as_ref().expect("used after close()")
    }
    fn mmap_mut(&mut self) -> &mut MmapMut {
        self.mmap.as_mut().expect("used after close()")
    }

    #[must_use]
    pub fn hashes(&self, key: &[u8], depth: Option<usize>) -> Vec<u64> {
        (self.hash_func)(key, depth.unwrap_or(self.number_hashes as usize))
    }

    pub fn add(&mut self, key: &[u8]) -> ProbablesResult<()> {
        let hashes = self.hashes(key, None);
        self.add_alt(&hashes)
    }

    pub fn add_alt(&mut self, hashes: &[u64]) -> ProbablesResult<()> {
        let m = self.number_bits;
        for &h in hashes {
            let idx = h % m;
            let (byte_idx, bit_offset) = ((idx >> 3) as usize, (idx & 7) as u8);
            self.mmap_mut()[byte_idx] |= 1 << bit_offset;
        }
        self.elements_added += 1;
        self.rewrite_footer()
    }

    #[must_use]
    pub fn check(&self, key: &[u8]) -> bool {
        self.check_alt(&self.hashes(key, None))
    }

    #[must_use]
    pub fn check_alt(&self, hashes: &[u64]) -> bool {
        hashes.iter().all(|&h| self.get_bit(h % self.number_bits))
    }

    #[must_use]
    pub fn estimate_elements(&self) -> i64 {
        let popcount: u64 = self.mmap()[..self.bloom_length as usize]
            .iter()
            .map(|b| u64::from(b.count_ones()))
            .sum();
        if popcount == self.number_bits {
            return -1;
        }
        let m = self.number_bits as f64;
        let k = self.number_hashes as f64;
        let ratio = 1.0 - (popcount as f64 / m);
        (-(m / k) * ratio.ln()).floor() as i64
    }

    #[must_use]
    pub fn current_false_positive_rate(&self) -> f64 {
        let k = f64::from(self.number_hashes);
        let exp = (-k * self.elements_added as f64 / self.number_bits as f64).exp();
        (1.0 - exp).powf(k)
    }

    pub fn clear(&mut self) -> ProbablesResult<()> {
        let bloom_length = self.bloom_length as usize;
        self.mmap_mut()[..bloom_length].fill(0);
        self.elements_added = 0;
        self.rewrite_footer()
    }

    fn rewrite_footer(&mut self) -> ProbablesResult<()> {
        let bloom_length = self.bloom_length as usize;
        let estimated_elements = self.estimated_elements;
        let elements_added = self.elements_added;
        let false_positive_rate = self.false_positive_rate;
        {
            let mut footer_slice = &mut self.mmap_mut()[bloom_length..];
            footer_slice.write_u64::<NativeEndian>(estimated_elements)?;
            footer_slice.write_u64::<NativeEndian>(elements_added)?;
            footer_slice.write_f32::<NativeEndian>(false_positive_rate)?;
        }
        self.mmap().flush()?;
        Ok(())
    }

    /// Copies the backing file to `path`. A no-op if `path` is the filter's
    /// own backing file.
    pub fn export<P: AsRef<Path>>(&mut self, path: P) -> ProbablesResult<()> {
        self.rewrite_footer()?;
        let target = path.as_ref();
        if target != self.path {
            fs::copy(&self.path, target)?;
        }
        Ok(())
    }

    /// Flushes and unmaps the backing file. Safe to call more than once.
    pub fn close(&mut self) -> ProbablesResult<()> {
        if let Some(mmap) = &self.mmap {
            mmap.flush()?;
        }
        self.mmap = None;
        self.file = None;
        Ok(())
    }

    /// Rejected: loading an on-disk bloom filter from hex is not supported.
    pub fn from_hex(_hex_string: &str) -> ProbablesResult<Self> {
        Err(ProbablesError::NotSupported(
            "loading an on-disk bloom filter from a hex string is not supported".into(),
        ))
    }

    /// Rejected: loading an on-disk bloom filter from an in-memory byte
    /// buffer is not supported — it must be backed by a real file.
    pub fn from_bytes(_bytes: &[u8]) -> ProbablesResult<Self> {
        Err(ProbablesError::NotSupported(
            "loading an on-disk bloom filter from a byte buffer is not supported".into(),
        ))
    }

    /// Rejected: the on-disk filter cannot export itself as a hex string.
    pub fn export_hex(&self) -> ProbablesResult<String> {
        Err(ProbablesError::NotSupported(
            "exporting an on-disk bloom filter as hex is not supported".into(),
        ))
    }
}

impl BloomLike for BloomFilterOnDisk {
    fn number_bits(&self) -> u64 {
        self.number_bits
    }
    fn number_hashes(&self) -> u32 {
        self.number_hashes
    }
    fn hash_function(&self) -> HashFunction {
        self.hash_func
    }
    fn get_bit(&self, idx: u64) -> bool {
        let (byte_idx, bit_offset) = ((idx >> 3) as usize, (idx & 7) as u8);
        (self.mmap()[byte_idx] >> bit_offset) & 1 == 1
    }
}

impl Drop for BloomFilterOnDisk {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn write_footer<W: Write>(
    w: &mut W,
    estimated_elements: u64,
    elements_added: u64,
    false_positive_rate: f32,
) -> io::Result<()> {
    w.write_u64::<NativeEndian>(estimated_elements)?;
    w.write_u64::<NativeEndian>(elements_added)?;
    w.write_f32::<NativeEndian>(false_positive_rate)?;
    Ok(())
}

