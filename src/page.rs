//! Server-side rendering of the prediction form.

use heart_core::{CodeOption, Field, FormState, codes};
use std::fmt::Write;

/// Render the whole page for `state`.
pub fn render(state: &FormState) -> String {
    let mut fields = String::new();
    for field in Field::ALL {
        let control = match field.options() {
            Some(options) => select(field, options, state.record.get(field)),
            None => number_input(field, state.record.get(field)),
        };
        let _ = write!(
            fields,
            r#"<div class="field"><label class="label" for="{name}">{caption}</label>{control}</div>"#,
            name = field.name(),
            caption = escape_html(field.caption()),
        );
    }

    let button = if state.loading {
        r#"<button type="submit" disabled>Predicting...</button>"#
    } else {
        r#"<button type="submit">Predict</button>"#
    };

    let mut result = String::new();
    if let Some(prediction) = state.prediction {
        let _ = write!(
            result,
            r#"<div class="result"><div class="prediction">{}</div><div class="risk">Risk: {}</div></div>"#,
            prediction.label(),
            prediction.risk_level(),
        );
    }
    if let Some(error) = &state.error {
        let _ = write!(
            result,
            r#"<div class="error" role="alert">{}</div>"#,
            escape_html(error)
        );
    }

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Heart Disease Prediction</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Heart Disease Prediction</h1>
<p class="muted">Categorical fields show labels but send numeric codes to the backend.</p>
<form method="post" action="/" class="card">{fields}<div class="actions">{button}</div></form>
{result}
</body>
</html>
"#
    )
}

fn number_input(field: Field, value: f64) -> String {
    let step = if field == Field::Oldpeak { "0.1" } else { "any" };
    format!(
        r#"<input id="{name}" name="{name}" type="number" step="{step}" value="{value}">"#,
        name = field.name(),
        value = format_number(value),
    )
}

fn select(field: Field, options: &[CodeOption], value: f64) -> String {
    let mut html = format!(r#"<select id="{name}" name="{name}">"#, name = field.name());

    // Keep values outside the table selectable so a resubmit sends them unchanged.
    if codes::label_for(options, value).is_none() {
        let raw = format_number(value);
        let _ = write!(html, r#"<option value="{raw}" selected>Code {raw}</option>"#);
    }

    for option in options {
        let selected = if option.code as f64 == value {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            option.code,
            selected,
            escape_html(option.label)
        );
    }
    html.push_str("</select>");
    html
}

/// `NaN` prints as an empty input; `Display` already drops a zero fraction.
fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:920px;margin:0 auto;padding:28px}\
.card{display:grid;grid-template-columns:repeat(2,1fr);gap:12px}\
.field{display:flex;flex-direction:column;gap:4px}\
.label{font-weight:600}\
.muted{color:#6b7280}\
.actions{grid-column:1/-1}\
.prediction{font-size:1.5em;font-weight:700}\
.error{color:#b91c1c;margin-top:12px}";
