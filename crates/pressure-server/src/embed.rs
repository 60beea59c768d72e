use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::Embed;

use crate::error::AppError;

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
struct Assets;

/// Serve embedded static assets (stylesheet, scripts). Unknown paths are 404.
pub async fn static_handler(uri: axum::http::Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match <Assets as Embed>::get(path).filter(|_| !path.ends_with(".html")) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({ "error": format!("not found: /{path}") })),
        )
            .into_response(),
    }
}

// ---------------------------------------------------------------------------
// Page templates
// ---------------------------------------------------------------------------

/// An embedded HTML template with `{{name}}` placeholders.
///
/// `text` values are HTML-escaped. `json` values are meant for
/// `<script type="application/json">` blocks and have `<` escaped so they
/// cannot close the tag.
pub struct Page {
    template: &'static str,
    vars: Vec<(&'static str, String)>,
}

impl Page {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            vars: Vec::new(),
        }
    }

    pub fn text(mut self, key: &'static str, value: impl AsRef<str>) -> Self {
        self.vars.push((key, escape_html(value.as_ref())));
        self
    }

    pub fn raw(mut self, key: &'static str, html: String) -> Self {
        self.vars.push((key, html));
        self
    }

    pub fn json(mut self, key: &'static str, value: &serde_json::Value) -> Self {
        self.vars
            .push((key, value.to_string().replace('<', "\\u003c")));
        self
    }

    pub fn render(self) -> Result<Html<String>, AppError> {
        let file = <Assets as Embed>::get(self.template)
            .ok_or_else(|| AppError(anyhow::anyhow!("missing page template {}", self.template)))?;
        let template = String::from_utf8(file.data.into_owned())?;
        Ok(Html(fill(&template, &self.vars)))
    }
}

/// Single pass over `template`; substituted values are never rescanned.
/// Unknown placeholders are left as written.
fn fill(template: &str, vars: &[(&'static str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, end))
        });
        match value {
            Some((v, end)) => {
                out.push_str(v);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
