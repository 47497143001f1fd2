//! Error taxonomy for the glyph rasterization core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VellumError>;

/// Failures surfaced by the cache, hint engine, rasterizer, or dispatcher.
///
/// These map directly onto the categories a PostScript-style interpreter
/// distinguishes at the language level (RangeCheck, TypeCheck, ...) rather
/// than onto any one subsystem's internal error type.
#[derive(Debug, Error)]
pub enum VellumError {
    /// Allocation failed. The caller may invoke a low-memory handler and retry.
    #[error("memory exhausted: {0}")]
    MemoryExhaustion(String),

    /// Font-wide constraints violated: bad FontType, missing FontMatrix, malformed Encoding.
    #[error("invalid font: {0}")]
    InvalidFont(String),

    /// Character has no definition and no notdef mapping.
    #[error("undefined character: {0}")]
    Undefined(String),

    /// A read-protected font dictionary was accessed.
    #[error("invalid access: {0}")]
    InvalidAccess(String),

    /// Numeric value out of range (metrics, Type 32 bitmap size, ...).
    #[error("range check: {0}")]
    RangeCheck(String),

    /// Argument type mismatch from the interpreter layer.
    #[error("type check: {0}")]
    TypeCheck(String),

    /// `setcachedevice`/`setcharwidth` called twice, or outside `BuildChar`.
    ///
    /// Surfaced to callers as [`VellumError::Undefined`] per the source
    /// interpreter's convention, but kept as a distinct variant internally
    /// so call sites can tell the two apart before translating.
    #[error("setcachedevice misuse: {0}")]
    SetCacheDeviceMisuse(String),

    /// Cache was cleared (or purged) while a glyph construction was in progress.
    #[error("policy violation: {0}")]
    PolicyViolation(String),
}

impl VellumError {
    /// Translate [`VellumError::SetCacheDeviceMisuse`] into `Undefined`, the
    /// observable category the interpreter actually reports.
    pub fn into_surfaced(self) -> Self {
        match self {
            VellumError::SetCacheDeviceMisuse(msg) => VellumError::Undefined(msg),
            other => other,
        }
    }
}
