use thiserror::Error;

/// The error surface shared by every filter and sketch in this workspace.
///
/// Mirrors the taxonomy used by the reference implementation this family of
/// data structures is modeled on: construction-time validation failures are
/// distinct from "this operation is not supported by this variant", which is
/// distinct again from the cuckoo filter's capacity-exhaustion case.
#[derive(Debug, Error)]
pub enum ProbablesError {
    /// Invalid constructor parameters or a malformed persisted footer.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// An operation this variant does not implement (e.g. loading an
    /// on-disk bloom filter from a hex string).
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The cuckoo filter could not place a fingerprint after exhausting
    /// `max_swaps` and `auto_expand` is `false`.
    ///
    /// `evicted` carries the fingerprint that was displaced during the swap
    /// chain and could not be reinserted, so a caller that wants it back can
    /// recover it instead of losing it silently.
    #[error("cuckoo filter is full")]
    CuckooFilterFull { evicted: Option<u32> },

    /// Two count-min sketches passed to `join` have incompatible geometry
    /// or hash functions.
    #[error("count-min sketch mismatch: {0}")]
    CountMinMismatch(String),

    /// A set-algebra operation (`union`, `intersection`, `jaccard_index`)
    /// was given an operand of the wrong concrete type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Propagated I/O failure (file load/export, memory-map setup).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProbablesResult<T> = Result<T, ProbablesError>;
