//! Compound argument records: comma-delimited, optionally quoted fields.
//!
//! A record such as `"C:\Tools", "Tool", tool.exe` is consumed field by
//! field through an explicit [`Fields`] cursor.  Each field has its quote,
//! space and tab padding stripped.  The cursor never validates how many
//! fields a record has; callers that need a fixed arity use
//! [`Fields::take_padded`], which fills missing trailing fields with empty
//! strings.

/// Default delimiter between fields of a compound record.
pub const DELIMITER: char = ',';

/// Characters stripped from both ends of every field and option value.
const PADDING: [char; 3] = ['"', ' ', '\t'];

/// Strip quote, space and tab padding from both ends of `value`.
///
/// Trimming is idempotent: trimming an already-trimmed value is a no-op.
///
/// # Examples
///
/// ```
/// use instmon_cli::config::fields::trim_argument;
///
/// assert_eq!(trim_argument("  \"C:\\Program Files\"\t"), "C:\\Program Files");
/// assert_eq!(trim_argument("plain"), "plain");
/// ```
#[must_use]
pub fn trim_argument(value: &str) -> &str {
    value.trim_matches(PADDING.as_slice())
}

/// Cursor over the fields of one compound record.
///
/// Created with [`Fields::start`]; each call to [`Iterator::next`] yields the
/// next trimmed field.  Once the final field has been returned the cursor is
/// exhausted and keeps returning `None`.  An empty record yields exactly one
/// empty field.
///
/// # Examples
///
/// ```
/// use instmon_cli::config::fields::Fields;
///
/// let fields: Vec<String> = Fields::start("\"a\", b ,c").collect();
/// assert_eq!(fields, ["a", "b", "c"]);
///
/// let empty: Vec<String> = Fields::start("").collect();
/// assert_eq!(empty, [""]);
/// ```
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    remaining: Option<&'a str>,
    delimiter: char,
}

impl<'a> Fields<'a> {
    /// Begin tokenizing `record` on the default comma delimiter.
    #[must_use]
    pub const fn start(record: &'a str) -> Self {
        Self::with_delimiter(record, DELIMITER)
    }

    /// Begin tokenizing `record` on a custom delimiter.
    #[must_use]
    pub const fn with_delimiter(record: &'a str, delimiter: char) -> Self {
        Self {
            remaining: Some(record),
            delimiter,
        }
    }

    /// Whether every field has already been produced.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining.is_none()
    }

    /// Take the next `N` fields, substituting empty strings for any that are
    /// absent.  Fields beyond `N` stay in the cursor.
    pub fn take_padded<const N: usize>(&mut self) -> [String; N] {
        std::array::from_fn(|_| self.next().unwrap_or_default())
    }
}

impl Iterator for Fields<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.remaining?;
        let raw = match current.split_once(self.delimiter) {
            Some((head, tail)) => {
                self.remaining = Some(tail);
                head
            }
            None => {
                self.remaining = None;
                current
            }
        };
        Some(trim_argument(raw).to_string())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn trim_strips_quotes_spaces_and_tabs() {
        assert_eq!(trim_argument("\" \tvalue\t \""), "value");
        assert_eq!(trim_argument("\"\""), "");
        assert_eq!(trim_argument(""), "");
    }

    #[test]
    fn trim_keeps_inner_padding() {
        assert_eq!(trim_argument("\"a \"b\" c\""), "a \"b\" c");
    }

    #[test]
    fn trim_is_idempotent() {
        for raw in ["  \"x y\" ", "\t", "a", "\"\"quoted\"\""] {
            let once = trim_argument(raw);
            assert_eq!(trim_argument(once), once);
        }
    }

    #[test]
    fn yields_fields_in_order() {
        let mut fields =
            Fields::start("HKEY_CURRENT_USER\\Software\\Acme, Version ,\"1.2\",string");
        assert_eq!(
            fields.next().as_deref(),
            Some("HKEY_CURRENT_USER\\Software\\Acme")
        );
        assert_eq!(fields.next().as_deref(), Some("Version"));
        assert_eq!(fields.next().as_deref(), Some("1.2"));
        assert_eq!(fields.next().as_deref(), Some("string"));
        assert!(fields.is_exhausted());
        assert_eq!(fields.next(), None);
        assert_eq!(fields.next(), None);
    }

    #[test]
    fn empty_record_yields_one_empty_field() {
        let mut fields = Fields::start("");
        assert!(!fields.is_exhausted());
        assert_eq!(fields.next().as_deref(), Some(""));
        assert_eq!(fields.next(), None);
    }

    #[test]
    fn trailing_delimiter_yields_empty_final_field() {
        let fields: Vec<String> = Fields::start("a,").collect();
        assert_eq!(fields, ["a", ""]);
    }

    #[test]
    fn custom_delimiter() {
        let fields: Vec<String> = Fields::with_delimiter("a;b;c", ';').collect();
        assert_eq!(fields, ["a", "b", "c"]);
    }

    #[test]
    fn take_padded_fills_missing_fields() {
        let mut fields = Fields::start("dir,link,target");
        let [path, name, target, args, description] = fields.take_padded::<5>();
        assert_eq!(path, "dir");
        assert_eq!(name, "link");
        assert_eq!(target, "target");
        assert!(args.is_empty());
        assert!(description.is_empty());
    }

    #[test]
    fn take_padded_leaves_extra_fields() {
        let mut fields = Fields::start("a,b,c");
        let [first] = fields.take_padded::<1>();
        assert_eq!(first, "a");
        assert_eq!(fields.next().as_deref(), Some("b"));
    }

    #[test]
    fn rejoining_fields_reproduces_trimmed_record() {
        let records = [
            "a,b,c",
            " \"a\" , b,\tc\t",
            "",
            ",,",
            "\"C:\\Program Files\\Acme\",Acme Tool",
        ];
        for record in records {
            let rejoined = Fields::start(record).collect::<Vec<_>>().join(",");
            let expected = record
                .split(',')
                .map(trim_argument)
                .collect::<Vec<_>>()
                .join(",");
            assert_eq!(rejoined, expected, "record: {record:?}");
        }
    }

    #[test]
    fn independent_cursors_do_not_interfere() {
        let mut outer = Fields::start("a,b");
        let mut inner = Fields::start("x,y");
        assert_eq!(outer.next().as_deref(), Some("a"));
        assert_eq!(inner.next().as_deref(), Some("x"));
        assert_eq!(outer.next().as_deref(), Some("b"));
        assert_eq!(inner.next().as_deref(), Some("y"));
    }
}
