use std::{
    cmp::min,
    fmt::{self, Display, Write},
};

/// The generic positional placeholder, drivers rewrite it into their own syntax.
pub const POSITIONAL_PLACEHOLDER: &str = "$#";

/// Rewrite each `$#` into `$1`, `$2`, ... in order of occurrence.
///
/// The rewrite is purely textual: markers inside string literals or comments
/// are numbered too.
/// ```rust
/// use slate_core::rewrite_positional_placeholders;
/// assert_eq!(
///     rewrite_positional_placeholders("SELECT * FROM t WHERE a = $# AND b = $#"),
///     "SELECT * FROM t WHERE a = $1 AND b = $2",
/// );
/// ```
pub fn rewrite_positional_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut rest = sql;
    let mut position = 1;
    while let Some(i) = rest.find(POSITIONAL_PLACEHOLDER) {
        out.push_str(&rest[..i]);
        let _ = write!(out, "${}", position);
        position += 1;
        rest = &rest[i + POSITIONAL_PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Display adapter printing at most the first 497 bytes of a query.
pub struct TruncateLong<'a>(pub &'a str);

impl Display for TruncateLong<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.0;
        let mut end = min(query.len(), 497);
        while !query.is_char_boundary(end) {
            end -= 1;
        }
        write!(
            f,
            "{}{}\n",
            query[..end].trim_end(),
            if query.len() > end { "..." } else { "" }
        )
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::TruncateLong(::std::convert::AsRef::<str>::as_ref(&$query))
    };
}
