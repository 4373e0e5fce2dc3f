//! Interactive HTML viewer for a rendered SVG graph.
//!
//! The page loads the SVG by file name, so it must sit in the same
//! directory as the image it wraps.

use super::{ensure_parent, validate_path};
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Build the viewer document for `svg_name`
///
/// **Public** - pure templating, used by [`write_viewer`] and tests
pub fn render_viewer(svg_name: &str, title: &str) -> String {
    let title = escape_html(title);
    let svg_name = escape_js(svg_name);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Profile Visualization - {title}</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }}
        h1 {{
            color: #333;
        }}
        .controls {{
            margin: 20px 0;
            padding: 10px;
            background: white;
            border-radius: 5px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        button {{
            margin: 5px;
            padding: 8px 15px;
            background: #4CAF50;
            color: white;
            border: none;
            border-radius: 3px;
            cursor: pointer;
        }}
        button:hover {{
            background: #45a049;
        }}
        #svg-container {{
            background: white;
            border-radius: 5px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            padding: 20px;
            overflow: auto;
        }}
    </style>
</head>
<body>
    <h1>Profile Visualization: {title}</h1>
    <div class="controls">
        <button onclick="zoomIn()">Zoom In</button>
        <button onclick="zoomOut()">Zoom Out</button>
        <button onclick="resetZoom()">Reset</button>
        <button onclick="downloadSVG()">Download SVG</button>
    </div>
    <div id="svg-container"></div>

    <script>
        const svgName = '{svg_name}';
        let currentScale = 1;

        fetch(svgName)
            .then(response => response.text())
            .then(data => {{
                document.getElementById('svg-container').innerHTML = data;
                const svg = document.querySelector('#svg-container svg');
                svg.id = 'profile-svg';
                svg.style.width = '100%';
                svg.style.height = 'auto';
            }});

        function zoomIn() {{
            currentScale *= 1.2;
            applyZoom();
        }}

        function zoomOut() {{
            currentScale /= 1.2;
            applyZoom();
        }}

        function resetZoom() {{
            currentScale = 1;
            applyZoom();
        }}

        function applyZoom() {{
            const svg = document.getElementById('profile-svg');
            if (svg) {{
                svg.style.transform = `scale(${{currentScale}})`;
                svg.style.transformOrigin = 'top left';
            }}
        }}

        function downloadSVG() {{
            const svg = document.getElementById('profile-svg');
            if (svg) {{
                const svgData = new XMLSerializer().serializeToString(svg);
                const blob = new Blob([svgData], {{type: 'image/svg+xml'}});
                const url = URL.createObjectURL(blob);
                const a = document.createElement('a');
                a.href = url;
                a.download = svgName;
                a.click();
            }}
        }}
    </script>
</body>
</html>
"#
    )
}

/// Write the viewer document for `svg_path` to `html_path`
///
/// **Public** - called by the pipeline when interactive output is requested
///
/// # Errors
/// * `OutputError::InvalidPath` - either path is unusable
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_viewer(
    svg_path: impl AsRef<Path>,
    title: &str,
    html_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let svg_path = svg_path.as_ref();
    let html_path = html_path.as_ref();

    validate_path(html_path)?;
    ensure_parent(html_path)?;

    let svg_name = svg_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            OutputError::InvalidPath(format!("No file name in {}", svg_path.display()))
        })?;

    let html = render_viewer(&svg_name, title);

    let file = File::create(html_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;

    info!("Interactive viewer written to: {}", html_path.display());
    Ok(())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_js(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_references_svg() {
        let html = render_viewer("profile_graph.svg", "profile");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("const svgName = 'profile_graph.svg';"));
        assert!(html.contains("Profile Visualization: profile"));
        assert!(html.contains("function zoomIn()"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_viewer("a.svg", "<script>");
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_write_viewer_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let html_path = temp_dir.path().join("nested/profile_interactive.html");

        write_viewer(temp_dir.path().join("profile_graph.svg"), "profile", &html_path).unwrap();

        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.contains("profile_graph.svg"));
    }

    #[test]
    fn test_write_viewer_rejects_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_viewer("x.svg", "x", temp_dir.path());
        assert!(result.is_err());
    }
}
