//! Column detection for loosely structured workout exports.

pub mod resolver;

pub use resolver::{
    resolve, resolve_with, ColumnOverrides, ColumnRole, ColumnSelection, Keywords, MatchKind,
    ResolvedColumn, ResolverNotice,
};
