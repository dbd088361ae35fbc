//! Self-contained HTML fragments for the comic widget.
//!
//! Everything is styled inline because the host embeds the fragment in an
//! isolated frame with no access to external stylesheets.

use crate::xkcd::Comic;

pub const PLACEHOLDER_HTML: &str = concat!(
    "<div style='max-width: 800px; margin: 0 auto; padding: 20px; font-family: Arial, sans-serif;'>",
    "  <div style='background: white; border: 2px solid black; border-radius: 8px; padding: 40px; text-align: center;'>",
    "    <h1 style='color: black; margin: 0 0 20px 0; font-size: 32px; font-weight: bold;'>XKCD Comic Viewer</h1>",
    "    <div style='background: white; border: 2px dashed #333; border-radius: 4px; padding: 30px; margin: 20px 0;'>",
    "      <p style='color: black; font-size: 18px; margin: 0 0 15px 0; font-weight: bold;'>Ready to display XKCD comics!</p>",
    "      <p style='color: #333; font-size: 14px; margin: 0; line-height: 1.6;'>",
    "        Request a comic to see it displayed here.<br>",
    "        Try: 'Show me the latest XKCD', 'https://xkcd.com/327/', or '#327'",
    "      </p>",
    "    </div>",
    "    <div style='margin-top: 30px; padding-top: 20px; border-top: 2px solid black;'>",
    "      <p style='color: #666; margin: 0; font-size: 12px;'>Comics by Randall Munroe &bull; Powered by XKCD API</p>",
    "    </div>",
    "  </div>",
    "</div>",
);

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_comic(comic: &Comic) -> String {
    let title = escape_html(&comic.title);
    let alt = escape_html(&comic.alt);
    let src = escape_html(comic.image.src());
    let original = escape_html(&comic.image.url);
    let num = comic.num;
    let date = comic.date();
    let page = comic.page_url();

    format!(
        r#"
<div style="max-width: 800px; margin: 0 auto; padding: 20px; font-family: Arial, sans-serif;">
    <div style="background: white; border: 2px solid black; border-radius: 8px; padding: 30px;">
        <h1 style="color: black; margin: 0 0 10px 0; font-size: 28px; font-weight: bold;">#{num} - {title}</h1>
        <p style="color: #333; margin: 0 0 20px 0; font-size: 14px;">Published: {date}</p>

        <div style="background: #f5f5f5; border: 1px solid #ddd; border-radius: 4px; padding: 20px; margin-bottom: 20px; text-align: center;">
            <img src="{src}"
                 alt="{alt}"
                 title="{alt}"
                 style="max-width: 100%; height: auto; display: block; margin: 0 auto; border: 1px solid #ccc;"
                 loading="eager"
                 onerror="this.style.display='none'; this.nextElementSibling.style.display='block';">
            <div style="display: none; padding: 20px; color: #ff4444;">
                Failed to load image. <a href="{original}" target="_blank" style="color: #ff4444;">View original</a>
            </div>
        </div>

        <div style="background: #f9f9f9; border-left: 4px solid black; border-radius: 4px; padding: 15px; margin-bottom: 20px;">
            <p style="color: #333; margin: 0; font-size: 14px; line-height: 1.6;">
                <strong style="color: black;">Alt text:</strong> {alt}
            </p>
        </div>

        <div style="margin-top: 20px; padding-top: 20px; border-top: 2px solid black; text-align: center;">
            <p style="color: #666; margin: 0; font-size: 12px;">
                Comic by Randall Munroe &bull; <a href="{page}" target="_blank" style="color: black; text-decoration: underline;">View on xkcd.com</a>
            </p>
        </div>
    </div>
</div>
"#
    )
}

pub fn render_error(message: &str) -> String {
    let message = escape_html(message);
    format!(
        r#"
<div style="padding: 20px; border: 2px solid #ff4444; border-radius: 8px; background: #fff0f0; font-family: Arial, sans-serif;">
    <h2 style="color: #ff4444; margin-top: 0;">Error Fetching Comic</h2>
    <p style="color: #333;">{message}</p>
</div>
"#
    )
}
