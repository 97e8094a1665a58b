//! HTML pages for the interactive form.

use crate::classifier::Prediction;

pub const FORM_PAGE: &str = r#"
<html>
  <head>
    <title>Naive Bayes Sentiment Classifier</title>
    <style>
      body { font-family: Arial, sans-serif; background: #f8f9fa; text-align: center; padding: 50px; }
      h1 { color: #333; }
      form { background: white; padding: 30px; border-radius: 10px; box-shadow: 0 0 10px rgba(0,0,0,0.1); display: inline-block; }
      input[type="text"] { width: 400px; padding: 10px; border-radius: 5px; border: 1px solid #ccc; }
      input[type="submit"] { padding: 10px 20px; border: none; border-radius: 5px; background: #007bff; color: white; font-size: 16px; cursor: pointer; }
      input[type="submit"]:hover { background: #0056b3; }
    </style>
  </head>
  <body>
    <h1>Movie Review Sentiment Analysis</h1>
    <form action="/analyze" method="post">
      <input name="text" placeholder="Enter your movie review here" size="60" required>
      <br><br>
      <input type="submit" value="Analyze Sentiment">
    </form>
  </body>
</html>
"#;

/// Escapes the characters that matter inside HTML text and attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn verdict_heading(label: &str) -> String {
    match label {
        "pos" => "<h2 style='color:green'>Positive 😊</h2>".to_string(),
        "neg" => "<h2 style='color:red'>Negative 😞</h2>".to_string(),
        other => format!("<h2 style='color:#6c757d'>{}</h2>", escape_html(other)),
    }
}

fn probability_list(prediction: &Prediction) -> String {
    let items: String = prediction
        .probabilities
        .iter()
        .map(|(class, p)| format!("<li><b>{}</b>: {:.4}</li>", escape_html(class), p))
        .collect();
    format!(
        "<h3>Probabilities:</h3><ul style='list-style:none; padding:0;'>{}</ul>",
        items
    )
}

/// Full result page for one classified review.
pub fn result_page(prediction: &Prediction) -> String {
    format!(
        r#"
<html>
  <head>
    <title>Sentiment Result</title>
    <style>
      body {{ font-family: Arial, sans-serif; background: #f8f9fa; text-align: center; padding: 50px; }}
      .box {{ background: white; padding: 30px; border-radius: 10px; box-shadow: 0 0 10px rgba(0,0,0,0.1); display: inline-block; }}
      a.button {{ display: inline-block; margin-top: 20px; padding: 10px 20px; border-radius: 5px; background: #6c757d; color: white; text-decoration: none; }}
      a.button:hover {{ background: #5a6268; }}
    </style>
  </head>
  <body>
    <div class="box">
      <h1>Sentiment Analysis Result</h1>
      {}
      {}
      <a href="/form" class="button">🔄 Analyze Another Review</a>
    </div>
  </body>
</html>
"#,
        verdict_heading(&prediction.label),
        probability_list(prediction)
    )
}
