use axum::response::Html;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>CrateDB Prometheus Adapter</title></head>
<body>
<h1>CrateDB Prometheus Adapter</h1>
<p>Prometheus remote storage endpoints backed by CrateDB.</p>
<ul>
<li><code>POST /write</code> remote write</li>
<li><code>POST /read</code> remote read</li>
<li><a href="/metrics">Metrics</a></li>
</ul>
</body>
</html>
"#;

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
