//! Markup loaded into the preview panel.
//!
//! The page is a full-size `<iframe>` plus a small script that speaks the
//! reachability protocol: it announces `ready`, and on every `setUrl` it
//! fires an opaque `no-cors` fetch at the URL before pointing the frame at
//! it. A rejected fetch is reported back as `alert`. Opaque fetches can be
//! refused by cross-origin policy while the frame itself loads fine, so an
//! alert is a hint, not proof.

/// Protocol script injected into the panel content.
pub const PANEL_SCRIPT: &str = r#"
(function () {
  const host = typeof acquireVsCodeApi === 'function'
    ? acquireVsCodeApi()
    : { postMessage: (msg) => window.ipc && window.ipc.postMessage(JSON.stringify(msg)) };
  const frame = document.getElementById('preview-window');

  function load(url) {
    fetch(url, { mode: 'no-cors', cache: 'no-store' })
      .catch(() => host.postMessage({ command: 'alert', error: true, url: url }));
    // The frame was rendered with this URL already
    if (frame.getAttribute('src') !== url) {
      frame.src = url;
    }
  }

  window.addEventListener('message', (event) => {
    // Only the host may retarget the frame, not the previewed page
    if (event.source === frame.contentWindow) {
      return;
    }
    const msg = event.data;
    if (msg && msg.command === 'setUrl' && typeof msg.url === 'string') {
      load(msg.url);
    }
  });

  host.postMessage({ command: 'ready' });
})();
"#;

const PANEL_STYLE: &str = r#"
html, body {
  width: 100%;
  height: 100%;
  margin: 0;
  padding: 0;
  overflow: hidden;
}
iframe {
  width: 100%;
  height: 100%;
  border: none;
  background: white;
}
"#;

/// Render the panel document showing `url`.
pub fn render(url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Loco Dev Preview</title>
  <style>{style}</style>
</head>
<body>
  <iframe id="preview-window" src="{src}">Bad link given to the preview frame.</iframe>
  <script>{script}</script>
</body>
</html>"#,
        style = PANEL_STYLE,
        src = escape_attr(url),
        script = PANEL_SCRIPT,
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
