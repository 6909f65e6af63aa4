// ABOUTME: HTML escaping for transcript content and its inverse for line editing

/// Escape the five markup-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reverse [`escape_html`]. Also understands numeric references; anything
/// that is not a recognised entity is kept literally.
pub fn unescape_html(escaped: &str) -> String {
    let mut raw = String::with_capacity(escaped.len());
    let mut rest = escaped;

    while let Some(amp) = rest.find('&') {
        raw.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match candidate.find(';').filter(|&end| end <= 10).and_then(|end| {
            decode_entity(&candidate[1..end]).map(|c| (c, end))
        }) {
            Some((c, end)) => {
                raw.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                raw.push('&');
                rest = &candidate[1..];
            }
        }
    }
    raw.push_str(rest);
    raw
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn unescape_recovers_original() {
        for raw in ["a < b && c > \"d\"", "&amp; literally", "'quoted'", "plain", "", "&", "&;", "naïve ✓"] {
            assert_eq!(unescape_html(&escape_html(raw)), raw);
        }
    }

    #[test]
    fn unescape_numeric_and_unknown() {
        assert_eq!(unescape_html("&#x3C;&#60;&nbsp;"), "<<&nbsp;");
        assert_eq!(unescape_html("AT&T"), "AT&T");
    }
}
