use lol_html::errors::RewritingError;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Adds `style="color: {color};"` to every `<a>` without a style of its own.
/// Everything else in the fragment is passed through untouched.
pub fn style_links(fragment: &str, color: &str) -> Result<String, RewritingError> {
    let style = format!("color: {};", color);

    let styled = rewrite_str(
        fragment,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("a", |el| {
                    if !el.has_attribute("style") {
                        el.set_attribute("style", &style)?;
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    );
    styled
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: &str = "#2563eb";

    #[test]
    fn test_adds_style() {
        let res = style_links(r#"<a href="x">t</a>"#, BLUE).unwrap();
        assert_eq!(res, r#"<a href="x" style="color: #2563eb;">t</a>"#);
    }

    #[test]
    fn test_keeps_existing_style() {
        let html = r#"<a href="x" style="color:red">t</a>"#;
        assert_eq!(style_links(html, BLUE).unwrap(), html);

        let html = r#"<a STYLE="font-weight: bold" href="x">t</a>"#;
        assert_eq!(style_links(html, BLUE).unwrap(), html);
    }

    #[test]
    fn test_only_links() {
        let html = r#"<p class="intro">Read <a href="/a" target="_blank">this</a> and <span>that</span>.</p>
<a href="/b"><img src="b.png"></a>"#;
        let res = style_links(html, BLUE).unwrap();
        assert_eq!(res, r#"<p class="intro">Read <a href="/a" target="_blank" style="color: #2563eb;">this</a> and <span>that</span>.</p>
<a href="/b" style="color: #2563eb;"><img src="b.png"></a>"#);
    }

    #[test]
    fn test_no_links() {
        let html = "<p>plain text</p>";
        assert_eq!(style_links(html, BLUE).unwrap(), html);
    }
}
