//! Built-in example and fallback artifacts

use sitesmith_domain::SiteArtifact;

/// Placeholder stylesheet used when a CSS framework is selected and the model
/// leaves the CSS section blank
pub const FRAMEWORK_CSS_PLACEHOLDER: &str = "/* Framework styles applied in HTML */";

const DEFAULT_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Default Portfolio</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <header>
        <h1>Photographer Portfolio</h1>
        <nav>
            <a href="#gallery">Gallery</a>
            <a href="#about">About</a>
            <a href="#contact">Contact</a>
        </nav>
    </header>
    <section id="gallery">
        <h2>Gallery</h2>
        <div class="gallery">
            <img src="https://placehold.co/300x300" alt="Photo 1">
            <img src="https://placehold.co/300x300" alt="Photo 2">
        </div>
    </section>
    <section id="about">
        <h2>About</h2>
        <p>Welcome to my photography portfolio!</p>
    </section>
    <section id="contact">
        <h2>Contact</h2>
        <form>
            <input type="text" placeholder="Name" required>
            <input type="email" placeholder="Email" required>
            <textarea placeholder="Message" required></textarea>
            <button type="submit">Send</button>
        </form>
    </section>
    <script src="script.js"></script>
</body>
</html>"##;

const DEFAULT_CSS: &str = r#"body {
    font-family: Arial, sans-serif;
    margin: 0;
    padding: 0;
}
header {
    background: #333;
    color: white;
    text-align: center;
    padding: 1em;
}
nav a {
    color: white;
    margin: 0 1em;
    text-decoration: none;
}
section {
    padding: 2em;
}
.gallery {
    display: flex;
    flex-wrap: wrap;
    gap: 1em;
    justify-content: center;
}
img {
    max-width: 100%;
    width: 300px;
    height: auto;
}
form {
    display: flex;
    flex-direction: column;
    gap: 1em;
    max-width: 400px;
}
input, textarea {
    padding: 0.5em;
}
button {
    padding: 0.5em;
    background: #333;
    color: white;
    border: none;
    cursor: pointer;
}"#;

const DEFAULT_JS: &str = r#"document.querySelector('form').addEventListener('submit', (e) => {
    e.preventDefault();
    alert('This is a demo form. No data is sent.');
});"#;

/// The site written when generation fails after the retry budget
pub fn default_website() -> SiteArtifact {
    SiteArtifact::new(DEFAULT_HTML, DEFAULT_CSS, DEFAULT_JS)
}

/// Kind of example shown to the model as inspiration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    /// Chat window with history and input
    Chatbot,
    /// Articles with a comment form
    Blog,
    /// Simple single-section portfolio
    Portfolio,
}

impl ExampleKind {
    /// Pick an example by keyword in the description
    pub fn for_description(description: &str) -> Self {
        let description = description.to_lowercase();
        if description.contains("chatbot") {
            ExampleKind::Chatbot
        } else if description.contains("blog") {
            ExampleKind::Blog
        } else {
            ExampleKind::Portfolio
        }
    }

    /// The example site itself
    pub fn site(&self) -> SiteArtifact {
        match self {
            ExampleKind::Chatbot => SiteArtifact::new(
                r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><title>Chatbot</title><link rel="stylesheet" href="styles.css"></head><body><div class="chat-container"><div class="chat-history" id="chatHistory"></div><input type="text" id="messageInput" placeholder="Type a message"><button onclick="sendMessage()">Send</button></div><script src="script.js"></script></body></html>"#,
                r#"body { font-family: 'Roboto', sans-serif; background: linear-gradient(to bottom, #e0f7fa, #80deea); } .chat-container { max-width: 600px; margin: 2em auto; padding: 1em; background: white; border-radius: 10px; } .chat-history { height: 300px; overflow-y: auto; margin-bottom: 1em; } input { width: 80%; padding: 0.5em; } button { padding: 0.5em 1em; background: #0288d1; color: white; border: none; }"#,
                r#"function sendMessage() { const input = document.getElementById('messageInput'); const history = document.getElementById('chatHistory'); const message = input.value; if (message) { const msgDiv = document.createElement('div'); msgDiv.textContent = 'User: ' + message; history.appendChild(msgDiv); input.value = ''; history.scrollTop = history.scrollHeight; } }"#,
            ),
            ExampleKind::Blog => SiteArtifact::new(
                r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><title>Blog</title><link rel="stylesheet" href="styles.css"></head><body><header><h1>My Blog</h1></header><main><article><h2>Post Title</h2><p>Post content...</p></article><section class="comments"><h3>Comments</h3><form><input type="text" placeholder="Add a comment"><button type="submit">Post</button></form></section></main><script src="script.js"></script></body></html>"#,
                r#"body { font-family: 'Georgia', serif; margin: 0; background: #f5f5f5; } header { background: #d81b60; color: white; text-align: center; padding: 1em; } main { max-width: 800px; margin: 2em auto; } article { background: white; padding: 1em; margin-bottom: 1em; } .comments { background: #ffebee; padding: 1em; } input { padding: 0.5em; width: 70%; } button { padding: 0.5em; background: #d81b60; color: white; border: none; }"#,
                r#"document.querySelector('form').addEventListener('submit', (e) => { e.preventDefault(); alert('Comment posted!'); });"#,
            ),
            ExampleKind::Portfolio => SiteArtifact::new(
                r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><title>Portfolio</title><link rel="stylesheet" href="styles.css"></head><body><header><h1>Portfolio</h1></header><section><h2>Welcome</h2><p>This is my portfolio.</p></section><script src="script.js"></script></body></html>"#,
                r#"body { font-family: 'Helvetica', sans-serif; background: #e8eaf6; margin: 0; } header { background: #3f51b5; color: white; text-align: center; padding: 1em; } section { max-width: 600px; margin: 2em auto; background: white; padding: 1em; border-radius: 5px; }"#,
                r#"console.log('Portfolio loaded');"#,
            ),
        }
    }
}

/// Page written when the model gives no usable code
pub const FALLBACK_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Empty Page</title>
    <style>
        body { font-family: Arial, sans-serif; }
    </style>
</head>
<body>
    <h1>Empty Page</h1>
    <script>
        console.log("Empty page loaded");
    </script>
</body>
</html>
"#;

/// File name used when the model gives no usable name
pub fn fallback_filename(unix_secs: u64, extension: &str) -> String {
    format!("task_{}.{}", unix_secs, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_selection() {
        assert_eq!(
            ExampleKind::for_description("A ChatBot for support"),
            ExampleKind::Chatbot
        );
        assert_eq!(ExampleKind::for_description("travel blog"), ExampleKind::Blog);
        assert_eq!(
            ExampleKind::for_description("bakery landing page"),
            ExampleKind::Portfolio
        );
    }

    #[test]
    fn test_default_website_links_assets() {
        let site = default_website();
        assert!(site.html.contains(r#"href="styles.css""#));
        assert!(site.html.contains(r#"src="script.js""#));
        assert!(!site.css.is_empty());
        assert!(!site.js.is_empty());
    }

    #[test]
    fn test_default_website_is_complete() {
        let site = default_website();
        assert!(site.html.contains(r##"<a href="#gallery">"##));
        assert!(site.html.contains(r#"id="contact""#));
        assert!(site.html.ends_with("</html>"));
    }

    #[test]
    fn test_fallback_filename() {
        assert_eq!(fallback_filename(1700000000, "html"), "task_1700000000.html");
    }
}
