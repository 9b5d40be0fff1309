#[cfg(test)]
pub const ISSUE_FORM_BODY: &str = "### Post title

Protein Folding in 2025

### Category

Science Labs

### Summary

How structure prediction changed the lab.
A short tour.

### Body HTML

<p>First paragraph.</p>

<p>Second with <a href=\"https://example.com\">a link</a>.</p>
";

#[cfg(test)]
pub const LABEL_BLOCK_BODY: &str = "Post title:
Agents for Retrosynthesis
Category:
AI Chemistry
SUMMARY:
Planning routes with language models.
BODY HTML:
<p>Body text.</p>
";

#[cfg(test)]
pub const TEMPLATE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Old Post - ChemBio AI Insights</title>
    <link rel="stylesheet" href="../assets/css/style.css">
</head>
<body>
    <header>
        <div class="container nav-container">
            <a href="../index.html" class="logo">
                <div class="logo-text">
                    <h1>ChemBio AI</h1>
                    <span>Insights</span>
                </div>
            </a>
        </div>
    </header>

    <main>
        <article class="container">
            <div class="article-header">
                <span style="color: var(--accent-color);">Old Category</span>
                <h1 style="font-size: 2.5rem;">Old Post</h1>
                <p style="color: #64748b;">November 25, 2025 • By Yi Qu</p>
            </div>

            <div class="article-body" style="font-size: 1.125rem;">
                <p style="margin-bottom: 1.5rem;">Old first paragraph.</p>
                <h1>Not the heading</h1>
                <div class="note"><p>Nested old content</p></div>
            </div>
            <!-- ENGAGE MODULE -->
            <section class="engage"><p>Like this post</p></section>
        </article>
    </main>

    <footer>
        <p>&copy; 2025 ChemBio AI Insights. All rights reserved.</p>
    </footer>
    <script src="../assets/js/engage.js"></script>
</body>
</html>
"##;
