//! Preview page generator: one chart per answer, rendered by the wasm loader

use std::path::Path;

use minijinja::{context, Environment};
use serde::Serialize;

use crate::error::{Error, Result};

/// HTML template for the preview page
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="fr"{% if dark %} class="dark"{% endif %}>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title|e }}</title>
    {% if chartjs_url %}<script src="{{ chartjs_url }}"></script>{% endif %}
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: #ffffff;
            color: #1a1a1a;
            padding: 2rem;
        }
        html.dark body { background: #0d1117; color: #c9d1d9; }
        h1 { font-size: 1.25rem; margin-bottom: 1rem; }
        .chart-wrapper { margin-bottom: 2rem; }
        .chart-wrapper h2 { font-size: 0.95rem; margin-bottom: 0.5rem; }
        .text-xs { font-size: 0.75rem; }
        .text-sm { font-size: 0.875rem; }
        .text-gray-400 { color: #9ca3af; }
        .text-red-500 { color: #ef4444; }
        .mt-1 { margin-top: 0.25rem; }
        .mt-2 { margin-top: 0.5rem; }
        #debug-log { font-size: 0.75rem; color: #6e7681; margin-bottom: 1rem; }
    </style>
</head>
<body>
    <h1>{{ title|e }}</h1>
    <div id="debug-log"></div>
    {% for chart in charts %}
    <div class="chart-wrapper" id="{{ chart.wrapper_id }}">
        <h2>Réponse {{ chart.answer_id|e }}</h2>
        <canvas id="{{ chart.canvas_id }}"></canvas>
    </div>
    {% else %}
    <p>Aucune réponse à afficher.</p>
    {% endfor %}
    <script type="module">
        import init, { fetchAndRenderAnswerData, configureChartLoader } from '{{ module_path }}';
        await init();
        configureChartLoader({{ loader_config }});
        window.fetchAndRenderAnswerData = fetchAndRenderAnswerData;
        const charts = {{ charts_json }};
        for (const chart of charts) {
            const wrapper = document.getElementById(chart.wrapper_id);
            fetchAndRenderAnswerData(chart.answer_id, chart.canvas_id, wrapper, chart.options);
        }
    </script>
</body>
</html>
"#;

/// Configuration for the preview page
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub title: String,
    /// Script tag source for Chart.js; `None` switches to the built-in renderer
    pub chartjs_url: Option<String>,
    /// Path of the wasm-bindgen JS module, relative to the page
    pub module_path: String,
    pub dark: bool,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Graphiques des réponses".to_string(),
            chartjs_url: Some("https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js".to_string()),
            module_path: "./pkg/answer_chart_web.js".to_string(),
            dark: false,
            x_label: None,
            y_label: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChartSlot {
    answer_id: String,
    canvas_id: String,
    wrapper_id: String,
    options: serde_json::Value,
}

/// Id-safe form of an answer id
fn slug(answer_id: &str) -> String {
    answer_id.replace(|c: char| !c.is_alphanumeric(), "-")
}

/// JSON that stays inert inside a `<script>` element.
fn script_json(json: String) -> minijinja::Value {
    minijinja::Value::from_safe_string(json.replace('<', "\\u003c"))
}

/// Generate the preview page HTML
pub fn generate_page(answer_ids: &[String], config: &PageConfig) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("page", PAGE_TEMPLATE)?;
    let template = env.get_template("page")?;

    let mut options = serde_json::Map::new();
    if let Some(ref x) = config.x_label {
        options.insert("xLabel".to_string(), x.clone().into());
    }
    if let Some(ref y) = config.y_label {
        options.insert("yLabel".to_string(), y.clone().into());
    }
    let options = serde_json::Value::Object(options);

    let charts: Vec<ChartSlot> = answer_ids
        .iter()
        .enumerate()
        .map(|(i, answer_id)| ChartSlot {
            answer_id: answer_id.clone(),
            // the index keeps ids unique when two answer ids share a slug
            canvas_id: format!("chart-{}-{}", i, slug(answer_id)),
            wrapper_id: format!("chart-wrapper-{}-{}", i, slug(answer_id)),
            options: options.clone(),
        })
        .collect();

    let renderer = if config.chartjs_url.is_some() { "chartjs" } else { "canvas" };
    let loader_config = serde_json::json!({ "renderer": renderer }).to_string();
    let charts_json = serde_json::to_string(&charts)?;

    let html = template.render(context! {
        title => &config.title,
        chartjs_url => &config.chartjs_url,
        module_path => &config.module_path,
        dark => config.dark,
        charts => &charts,
        charts_json => script_json(charts_json),
        loader_config => script_json(loader_config),
    })?;

    Ok(html)
}

/// Write the preview page to a file
pub fn write_page(answer_ids: &[String], config: &PageConfig, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let html = generate_page(answer_ids, config)?;
    std::fs::write(output, html).map_err(|e| Error::FileWrite {
        path: output.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_page_empty() {
        let html = generate_page(&[], &PageConfig::default()).unwrap();
        assert!(html.contains("Aucune réponse à afficher."));
        assert!(html.contains("const charts = [];"));
    }

    #[test]
    fn test_generate_page_with_answers() {
        let config = PageConfig {
            y_label: Some("Score".to_string()),
            dark: true,
            ..Default::default()
        };
        let html = generate_page(&["3".to_string(), "a b".to_string()], &config).unwrap();

        assert!(html.contains(r#"<html lang="fr" class="dark">"#));
        assert!(html.contains(r#"<canvas id="chart-0-3"></canvas>"#));
        assert!(html.contains(r#"<canvas id="chart-1-a-b"></canvas>"#));
        assert!(html.contains(r#""yLabel":"Score""#));
        assert!(html.contains("chart.umd.min.js"));
        assert!(html.contains(r#"configureChartLoader({"renderer":"chartjs"})"#));
    }

    #[test]
    fn test_without_chartjs_uses_canvas_renderer() {
        let config = PageConfig {
            chartjs_url: None,
            ..Default::default()
        };
        let html = generate_page(&["3".to_string()], &config).unwrap();

        assert!(!html.contains("<script src="));
        assert!(html.contains(r#"configureChartLoader({"renderer":"canvas"})"#));
    }

    #[test]
    fn test_write_page() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("dist/index.html");
        write_page(&["3".to_string()], &PageConfig::default(), &output).unwrap();
        assert!(std::fs::read_to_string(output).unwrap().contains("chart-0-3"));
    }

    #[test]
    fn test_colliding_slugs_get_distinct_ids() {
        let html = generate_page(&["a b".to_string(), "a-b".to_string()], &PageConfig::default()).unwrap();
        assert_eq!(html.matches(r#"<canvas id="chart-0-a-b">"#).count(), 1);
        assert_eq!(html.matches(r#"<canvas id="chart-1-a-b">"#).count(), 1);
        assert_eq!(html.matches(r#"id="chart-wrapper-0-a-b""#).count(), 1);
        assert_eq!(html.matches(r#"id="chart-wrapper-1-a-b""#).count(), 1);
    }

    #[test]
    fn test_labels_cannot_close_the_module_script() {
        let config = PageConfig {
            y_label: Some("</script><script>alert(1)</script>".to_string()),
            ..Default::default()
        };
        let html = generate_page(&["</script>".to_string()], &config).unwrap();

        let script = &html[html.find(r#"<script type="module">"#).unwrap()..];
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(html.contains("<h2>Réponse &lt;&#x2f;script&gt;</h2>"));
        assert!(script.contains(r#""yLabel":"\u003c/script>\u003cscript>alert(1)\u003c/script>""#));
    }
}
