use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::config::TemplateAnchors;

const DOCUMENT_TPL: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{post_title}} - {{site_name}}</title>
    <link rel="stylesheet" href="../assets/css/style.css">
</head>
<body>
    <header>
        <div class="container nav-container">
            <a href="../index.html" class="logo">
                <div class="logo-text">
                    <h1>{{site_name}}</h1>
                </div>
            </a>
            <nav>
                <a href="../index.html" class="btn">Back to Home</a>
            </nav>
        </div>
    </header>

    <main>
        <article class="container" style="max-width: 800px; margin-top: 3rem; margin-bottom: 5rem;">
            <div class="article-header" style="text-align: center; margin-bottom: 3rem;">
                <span style="color: var(--accent-color); font-weight: 600; text-transform: uppercase; letter-spacing: 0.1em;">{{category}}</span>
                <h1 style="font-size: 2.5rem; margin: 1rem 0; color: var(--primary-color);">{{post_title}}</h1>
                <p style="color: #64748b;">{{date}} • By {{author}}</p>
            </div>

            <div class="{{body_class}}" style="font-size: 1.125rem; color: var(--text-color);">
{{{post_content}}}
            </div>
            <!-- {{end_marker}} -->
        </article>
    </main>

    <footer>
        <div class="container footer-content">
            <p>&copy; {{year}} {{site_name}}. All rights reserved.</p>
        </div>
    </footer>
</body>
</html>
"##;

#[derive(ramhorns::Content)]
struct DocumentView<'a> {
    site_name: &'a str,
    post_title: &'a str,
    category: &'a str,
    date: &'a str,
    author: &'a str,
    year: &'a str,
    body_class: &'a str,
    end_marker: &'a str,
    post_content: &'a str,
}

/// Fields of a standalone post document
pub struct DocumentFields<'a> {
    pub title: &'a str,
    pub category: &'a str,
    pub date: &'a str,
    pub year: &'a str,
    pub body_html: &'a str,
}

/// Full post pages for posts that have no scaffold to copy from
pub struct DocumentRenderer<'a> {
    template: Template<'a>,
    site_name: String,
    author: String,
    anchors: TemplateAnchors,
}

impl DocumentRenderer<'static> {
    pub fn new(site_name: &str, author: &str, anchors: &TemplateAnchors) -> io::Result<Self> {
        let template = match Template::new(DOCUMENT_TPL) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing document template: {}", e)));
            }
        };

        Ok(DocumentRenderer {
            template,
            site_name: site_name.to_string(),
            author: author.to_string(),
            anchors: anchors.clone(),
        })
    }
}

impl DocumentRenderer<'_> {
    pub fn render(&self, fields: &DocumentFields) -> String {
        self.template.render(&DocumentView {
            site_name: &self.site_name,
            post_title: fields.title,
            category: fields.category,
            date: fields.date,
            author: &self.author,
            year: fields.year,
            body_class: &self.anchors.body_class,
            end_marker: self.anchors.end_marker.trim(),
            post_content: fields.body_html,
        })
    }
}
