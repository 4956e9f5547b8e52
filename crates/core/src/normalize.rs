//! HTML normalisation before fingerprinting.
//!
//! Pages carry markup that changes on every request without any visible change: inline
//! scripts with nonces or timestamps, `<meta>` tags with CSRF tokens or build ids. Those
//! elements are dropped before hashing so only real content changes move the fingerprint.
//!
//! The rewriter is streaming and lenient. Malformed markup is passed through as-is; only the
//! matched elements are removed, and everything around them is emitted byte for byte.
//!
//! `<noscript>` content is tokenized as raw text, so element handlers never see markup inside
//! it. That text is collected and normalised on its own, then written back as HTML.
//!
//! An XHTML-style `<script/>` is not self-closing in HTML: it opens a script element that runs
//! to the next `</script>` or the end of input, and all of that is removed.

use crate::NormalizeError;
use lol_html::html_content::ContentType;
use lol_html::{element, text, HtmlRewriter, Settings};

/// Removes every `<script>` and `<meta>` element (with content) and all `\r` characters.
pub fn normalize(raw: &str) -> Result<String, NormalizeError> {
    let mut output = Vec::with_capacity(raw.len());
    let mut noscript = String::new();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("script", |el| {
                    el.remove();
                    Ok(())
                }),
                element!("meta", |el| {
                    el.remove();
                    Ok(())
                }),
                text!("noscript", |chunk| {
                    noscript.push_str(chunk.as_str());
                    if chunk.last_in_text_node() {
                        let inner = normalize(&noscript).map_err(|e| e.to_string())?;
                        chunk.replace(&inner, ContentType::Html);
                        noscript.clear();
                    } else {
                        chunk.remove();
                    }
                    Ok(())
                }),
            ],
            // Ambiguous parsing contexts are rewritten best-effort instead of aborting.
            strict: false,
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );

    rewriter.write(raw.as_bytes())?;
    rewriter.end()?;

    let html = String::from_utf8(output)?;
    Ok(html.replace('\r', ""))
}
