//! Markdown to styled HTML for the email body

use pulldown_cmark::{Event, Options, Parser, html};

const STYLESHEET: &str = r"body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    line-height: 1.6;
    color: #333;
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
    background-color: #f5f5f5;
}
h1, h2, h3 {
    color: #2c3e50;
    border-bottom: 2px solid #3498db;
    padding-bottom: 10px;
}
table {
    border-collapse: collapse;
    width: 100%;
    margin: 20px 0;
    background-color: white;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
th {
    background-color: #3498db;
    color: white;
    padding: 12px;
    text-align: left;
}
td {
    padding: 10px;
    border-bottom: 1px solid #ddd;
}
tr:hover {
    background-color: #f5f5f5;
}
code {
    background-color: #f4f4f4;
    padding: 2px 6px;
    border-radius: 3px;
    font-family: 'Courier New', monospace;
}
blockquote {
    border-left: 4px solid #3498db;
    padding-left: 20px;
    margin: 20px 0;
    color: #666;
}
";

/// Render Markdown into a standalone, styled HTML document
///
/// Tables and strikethrough are enabled and single line breaks are kept as
/// `<br />`, since model output relies on them for layout.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut body = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body, parser);

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n{STYLESHEET}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_render() {
        let html = markdown_to_html("| 指数 | 收盘 |\n|---|---|\n| 上证指数 | 3976.52 |\n");

        assert!(html.contains("<table>"));
        assert!(html.contains("<th>指数</th>"));
        assert!(html.contains("<td>3976.52</td>"));
    }

    #[test]
    fn test_soft_breaks_become_line_breaks() {
        let html = markdown_to_html("第一行\n第二行");
        assert!(html.contains("第一行<br />"));
    }

    #[test]
    fn test_fenced_code_and_strikethrough() {
        let html = markdown_to_html("```\nlet x = 1;\n```\n\n~~旧观点~~");

        assert!(html.contains("<pre><code>let x = 1;\n</code></pre>"));
        assert!(html.contains("<del>旧观点</del>"));
    }

    #[test]
    fn test_document_is_styled() {
        let html = markdown_to_html("# 标题");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("border-bottom: 2px solid #3498db"));
        assert!(html.contains("<h1>标题</h1>"));
    }
}
