/// Joins `items` with `sep`, using `last_sep` before the final item.
///
/// `fancy_join(", ", &["a", "b", "c"], " & ")` gives `"a, b & c"`.
pub fn fancy_join<S: AsRef<str>>(sep: &str, items: &[S], last_sep: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(AsRef::as_ref).collect();
            format!("{}{}{}", head.join(sep), last_sep, last.as_ref())
        }
    }
}

/// Renders an optional display value, `-` when absent.
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
